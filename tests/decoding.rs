use restruct::hook::{self, DecodeHook};
use restruct::*;
use std::collections::HashMap;
use std::net::IpAddr;

#[derive(Clone, Default, Debug, PartialEq)]
struct Person {
    name: String,
    age: i64,
    emails: Vec<String>,
}

record!(Person { name, age, emails });

fn mitchell() -> Value {
    Value::new_map(vec![
        ("name", Value::from("Mitchell")),
        ("age", Value::from(91)),
        ("emails", Value::new_seq(vec!["one", "two", "three"])),
    ])
}

fn namespaces(err: &Error) -> Vec<String> {
    let mut v: Vec<String> = err
        .decode_errors()
        .map(|errs| errs.iter().map(|e| e.namespace().to_string()).collect())
        .unwrap_or_default();
    v.sort();
    v
}

#[test]
fn basic_scenario() {
    let mut person = Person::default();
    decode(&mitchell(), &mut person).unwrap();

    assert_eq!(
        person,
        Person {
            name: "Mitchell".into(),
            age: 91,
            emails: vec!["one".into(), "two".into(), "three".into()],
        }
    );
}

#[test]
fn basic_scenario_errors() {
    let input = Value::new_map(vec![("name", Value::from(123)), ("age", Value::from("bad"))]);
    let err = input.decode::<Person>().unwrap_err();

    assert_eq!(err.decode_errors().map(|e| e.len()), Some(2));
    assert_eq!(
        err.to_string(),
        "2 error(s) decoding:\n\n\
         * age: expected type 'i64', got unconvertible type 'string', value: 'bad'\n\
         * name: expected type 'String', got unconvertible type 'int', value: '123'"
    );
}

#[test]
fn every_bad_field_is_reported() {
    let input = Value::new_map(vec![
        ("name", Value::from(true)),
        ("age", Value::from("x")),
        ("emails", Value::from(1.5)),
    ]);
    let err = input.decode::<Person>().unwrap_err();
    assert_eq!(namespaces(&err), vec!["age", "emails", "name"]);
}

#[test]
fn errors_keep_source_and_destination() {
    let mut person = Person {
        age: 5,
        ..Default::default()
    };
    let err = decode(&Value::new_map(vec![("age", "x")]), &mut person).unwrap_err();
    let e = err.decode_errors().and_then(|e| e.iter().next()).unwrap();

    assert_eq!(e.kind(), ErrorKind::UnexpectedType);
    assert_eq!(e.source_value(), Some(&Value::from("x")));
    assert_eq!(e.destination_value(), Some(&Value::from(5)));
}

// ********************* NESTING **********************************************

#[derive(Clone, Default, Debug, PartialEq)]
struct Leaf {
    c: u8,
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Branch {
    b: Leaf,
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Root {
    a: Branch,
    items: Vec<Leaf>,
    by_name: HashMap<String, Leaf>,
}

record!(Leaf { c });
record!(Branch { b });
record!(Root { a, items, by_name });

#[test]
fn nested_namespace() {
    let input = Value::new_map(vec![(
        "a",
        Value::new_map(vec![("b", Value::new_map(vec![("c", "x")]))]),
    )]);
    let err = input.decode::<Root>().unwrap_err();
    assert_eq!(namespaces(&err), vec!["a.b.c"]);
}

#[test]
fn namespaces_through_collections() {
    let input = Value::new_map(vec![
        (
            "items",
            Value::new_seq(vec![
                Value::new_map(vec![("c", 1)]),
                Value::new_map(vec![("c", -1)]),
            ]),
        ),
        (
            "by_name",
            Value::new_map(vec![("first", Value::new_map(vec![("c", "no")]))]),
        ),
    ]);
    let err = input.decode::<Root>().unwrap_err();
    assert_eq!(namespaces(&err), vec!["by_name[first].c", "items[1].c"]);
}

#[test]
fn nested_metadata_uses_keys() {
    let input = Value::new_map(vec![
        ("a", Value::new_map(vec![("b", Value::new_map(vec![("c", 1)]))])),
        ("items", Value::new_seq(vec![Value::new_map(vec![("c", 2), ("d", 3)])])),
    ]);
    let mut out = Root::default();
    let mut md = Metadata::default();
    decode_metadata(&input, &mut out, &mut md).unwrap();

    assert_eq!(md.keys, vec!["a.b.c", "a.b", "a", "items[0].c", "items[0]", "items"]);
    assert_eq!(md.unused, vec!["items[0].d"]);
    assert_eq!(md.unset, vec!["by_name"]);
}

// ********************* ROUND TRIPS ******************************************

#[test]
fn record_map_record() {
    let original = Person {
        name: "Ada".into(),
        age: 36,
        emails: vec!["ada@example.com".into()],
    };

    let map: HashMap<String, Value> = original.to_value().decode().unwrap();
    assert_eq!(map.len(), 3);

    let back: Person = map.to_value().decode().unwrap();
    assert_eq!(back, original);
}

#[test]
fn same_type_copies_whole() {
    let original = Person {
        name: "Ada".into(),
        age: -1,
        emails: vec![],
    };
    let back: Person = original.to_value().decode().unwrap();
    assert_eq!(back, original);
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Contact {
    name: String,
    emails: Vec<String>,
}

record!(Contact { name, emails });

#[test]
fn record_into_other_record() {
    let p = Person {
        name: "Ada".into(),
        age: 36,
        emails: vec!["a".into()],
    };
    let mut c = Contact::default();
    let mut md = Metadata::default();
    decode_metadata(&p.to_value(), &mut c, &mut md).unwrap();

    assert_eq!(c.name, "Ada");
    assert_eq!(c.emails, vec!["a"]);
    assert_eq!(md.unused, vec!["age"]);
}

// ********************* WEAK TYPING ******************************************

#[test]
fn weak_boundaries() {
    let mut b = true;
    decode_weak(&Value::from("0"), &mut b).unwrap();
    assert!(!b);

    let mut i = 7i32;
    decode_weak(&Value::from(""), &mut i).unwrap();
    assert_eq!(i, 0);

    let mut u = 0u32;
    let err = decode_weak(&Value::from("-1"), &mut u).unwrap_err();
    assert_eq!(
        err.decode_errors()
            .and_then(|e| e.iter().next())
            .map(|e| e.kind()),
        Some(ErrorKind::Overflow)
    );

    Decoder::new(DecoderConfig {
        weakly_typed_input: true,
        wrap_negative_unsigned: true,
        result: Some(&mut u),
        ..Default::default()
    })
    .unwrap()
    .decode(&Value::from("-1"))
    .unwrap();
    assert_eq!(u, u32::MAX);
}

#[test]
fn weak_record() {
    let input = Value::new_map(vec![
        ("name", Value::from(12)),
        ("age", Value::from("0x10")),
        ("emails", Value::from("only@example.com")),
    ]);
    let mut p = Person::default();
    decode_weak(&input, &mut p).unwrap();

    assert_eq!(p.name, "12");
    assert_eq!(p.age, 16);
    assert_eq!(p.emails, vec!["only@example.com"]);
}

#[test]
fn weak_parse_errors_wrap_cause() {
    use std::error::Error as _;

    let mut p = Person::default();
    let err = decode_weak(&Value::new_map(vec![("age", "ten")]), &mut p).unwrap_err();
    let e = err.decode_errors().and_then(|e| e.iter().next()).unwrap();

    assert_eq!(e.kind(), ErrorKind::Parse);
    assert_eq!(e.to_string(), "age: cannot parse as int: parsing \"ten\": invalid syntax");
    assert!(e.source().is_some());
}

// ********************* METADATA *********************************************

#[derive(Clone, Default, Debug, PartialEq)]
struct Pair {
    name: String,
    age: u8,
}

record!(Pair { name, age });

#[test]
fn metadata_keys_unused_unset() {
    let input = Value::new_map(vec![("name", Value::from("x")), ("extra", Value::from(1))]);
    let mut out = Pair::default();
    let mut md = Metadata::default();
    decode_metadata(&input, &mut out, &mut md).unwrap();

    assert_eq!(md.keys, vec!["name"]);
    assert_eq!(md.unused, vec!["extra"]);
    assert_eq!(md.unset, vec!["age"]);
}

#[test]
fn metadata_is_appended_to() {
    let mut md = Metadata {
        keys: vec!["earlier".into()],
        ..Default::default()
    };
    let mut out = Pair::default();
    decode_weak_metadata(&Value::new_map(vec![("age", "3")]), &mut out, &mut md).unwrap();

    assert_eq!(out.age, 3);
    assert_eq!(md.keys, vec!["earlier", "age"]);
}

// ********************* SQUASH ***********************************************

#[derive(Clone, Default, Debug, PartialEq)]
struct Audit {
    created: String,
    by: String,
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Document {
    audit: Audit,
    title: String,
}

#[derive(Clone, Default, Debug, PartialEq)]
struct FlatDocument {
    created: String,
    by: String,
    title: String,
}

#[derive(Clone, Default, Debug, PartialEq)]
struct MaybeAudited {
    audit: Option<Audit>,
    title: String,
}

record!(Audit { created, by });
record!(Document {
    #[embedded] audit: restruct = ",squash",
    title,
});
record!(FlatDocument { created, by, title });
record!(MaybeAudited {
    audit: restruct = ",squash",
    title,
});

fn flat_document() -> Value {
    Value::new_map(vec![("created", "today"), ("by", "me"), ("title", "notes")])
}

#[test]
fn squash_matches_flat_declaration() {
    let doc: Document = flat_document().decode().unwrap();
    let flat: FlatDocument = flat_document().decode().unwrap();

    assert_eq!(doc.audit.created, flat.created);
    assert_eq!(doc.audit.by, flat.by);
    assert_eq!(doc.title, flat.title);
}

#[test]
fn squash_through_present_option() {
    let mut out = MaybeAudited {
        audit: Some(Audit::default()),
        title: String::new(),
    };
    decode(&flat_document(), &mut out).unwrap();
    assert_eq!(out.audit.map(|a| a.by), Some("me".to_string()));

    let err = flat_document().decode::<MaybeAudited>().unwrap_err();
    assert_eq!(
        err.decode_errors()
            .and_then(|e| e.iter().next())
            .map(|e| e.kind()),
        Some(ErrorKind::Squash)
    );
}

#[test]
fn squashed_record_flattens_back() {
    let doc: Document = flat_document().decode().unwrap();
    let map: HashMap<String, String> = doc.to_value().decode().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("by").map(String::as_str), Some("me"));
}

// ********************* HOOKS ************************************************

#[test]
fn noop_hook_changes_nothing() {
    let plain: Person = mitchell().decode().unwrap();

    let mut hooked = Person::default();
    Decoder::new(DecoderConfig {
        hook: Some(hook::noop()),
        result: Some(&mut hooked),
        ..Default::default()
    })
    .unwrap()
    .decode(&mitchell())
    .unwrap();

    assert_eq!(hooked, plain);
}

#[test]
fn hook_errors_are_placed() {
    let refuse_bytes = DecodeHook::new(|_, to, data| {
        if to.is::<u8>() {
            Err("no bytes here".into())
        } else {
            Ok(data)
        }
    });

    let input = Value::new_map(vec![(
        "a",
        Value::new_map(vec![("b", Value::new_map(vec![("c", 1)]))]),
    )]);
    let mut out = Root::default();
    let err = Decoder::new(DecoderConfig {
        hook: Some(refuse_bytes),
        result: Some(&mut out),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap_err();

    let e = err.iter().next().unwrap();
    assert_eq!(e.kind(), ErrorKind::Hook);
    assert_eq!(e.to_string(), "a.b.c: error decoding: no bytes here");
}

#[test]
fn hook_decode_errors_keep_their_path() {
    let strict = DecodeHook::new(|from, to, data| {
        if to.kind() == Kind::Seq && from.kind() == Kind::Seq {
            Err(DecodeError::new(ErrorKind::Custom, "too long")
                .at(&Namespace::new().index(3))
                .into())
        } else {
            Ok(data)
        }
    });

    let mut out = Person::default();
    let err = Decoder::new(DecoderConfig {
        hook: Some(strict),
        result: Some(&mut out),
        ..Default::default()
    })
    .unwrap()
    .decode(&mitchell())
    .unwrap_err();

    assert_eq!(err.to_string(), "1 error(s) decoding:\n\n* emails[3]: too long");
    assert_eq!(out.name, "Mitchell");
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Count {
    n: u8,
}

#[derive(Clone, Default, Debug, PartialEq)]
struct Counted {
    inner: Count,
}

record!(Count { n });
record!(Counted { inner });

#[test]
fn hook_running_a_decoder_keeps_node_path() {
    let validate = DecodeHook::new(|_, to, data| {
        if to.is::<Count>() {
            let mut check = Count::default();
            Decoder::new(DecoderConfig {
                result: Some(&mut check),
                ..Default::default()
            })?
            .decode(&data)?;
        }
        Ok(data)
    });

    let input = Value::new_map(vec![("inner", Value::new_map(vec![("n", "x")]))]);
    let mut out = Counted::default();
    let err = Decoder::new(DecoderConfig {
        hook: Some(validate),
        result: Some(&mut out),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "1 error(s) decoding:\n\n\
         * inner.n: expected type 'u8', got unconvertible type 'string', value: 'x'"
    );
}

#[test]
fn empty_hook_failure_is_no_failure() {
    let silent = DecodeHook::new(|_, _, _| Err(DecodeErrors::new().into()));

    let mut n = 0u8;
    Decoder::new(DecoderConfig {
        hook: Some(silent),
        result: Some(&mut n),
        ..Default::default()
    })
    .unwrap()
    .decode(&Value::from(7))
    .unwrap();
    assert_eq!(n, 7);

    let mut p = Pair::default();
    let silent = DecodeHook::new(|_, _, _| Err(DecodeErrors::new().into()));
    Decoder::new(DecoderConfig {
        hook: Some(silent),
        result: Some(&mut p),
        ..Default::default()
    })
    .unwrap()
    .decode(&Value::new_map(vec![("name", "x")]))
    .unwrap();
    assert_eq!(p.name, "x");
}

#[test]
fn composed_hooks() {
    let trim = DecodeHook::new(|_, _, data| match data {
        Value::Str(s) => Ok(Value::Str(s.trim().to_string())),
        other => Ok(other),
    });
    let h = hook::compose(vec![trim, hook::string_to_seq(",")]);

    let input = Value::new_map(vec![("name", " Ada "), ("emails", " a,b ")]);
    let mut p = Person::default();
    Decoder::new(DecoderConfig {
        hook: Some(h),
        result: Some(&mut p),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap();

    assert_eq!(p.name, "Ada");
    assert_eq!(p.emails, vec!["a", "b"]);
}

#[test]
fn first_successful_hook() {
    let only_ints = DecodeHook::new(|_, _, data| match data {
        Value::Num(_) => Ok(data),
        _ => Err("not a number".into()),
    });
    let h = hook::or_compose(vec![only_ints, hook::noop()]);

    let mut n = 0i64;
    Decoder::new(DecoderConfig {
        hook: Some(h),
        result: Some(&mut n),
        ..Default::default()
    })
    .unwrap()
    .decode(&Value::from(3))
    .unwrap();
    assert_eq!(n, 3);
}

#[derive(Clone, Default, Debug)]
struct Server {
    host: Opaque<IpAddr>,
    port: u16,
}

record!(Server { host, port });

#[test]
fn ip_addresses_through_hook() {
    let input = Value::new_map(vec![("host", Value::from("10.0.0.1")), ("port", Value::from(8080))]);

    let mut server = Server::default();
    Decoder::new(DecoderConfig {
        hook: Some(hook::string_to_ip_addr()),
        result: Some(&mut server),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap();

    assert_eq!(server.host.get(), "10.0.0.1".parse::<IpAddr>().ok().as_ref());
    assert_eq!(server.port, 8080);

    let err = input.decode::<Server>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "1 error(s) decoding:\n\n\
         * host: expected type 'IpAddr', got unconvertible type 'string', value: '10.0.0.1'"
    );
}

#[test]
fn hook_nil_resets_pointer() {
    let blank_is_nil = DecodeHook::new(|_, _, data| match data {
        Value::Str(s) if s.is_empty() => Ok(Value::Nil),
        other => Ok(other),
    });

    let mut out: Option<String> = Some("keep?".into());
    Decoder::new(DecoderConfig {
        hook: Some(blank_is_nil),
        result: Some(&mut out),
        ..Default::default()
    })
    .unwrap()
    .decode(&Value::from(""))
    .unwrap();
    assert_eq!(out, None);
}

// ********************* CONFIGURATION ****************************************

#[test]
fn missing_destination() {
    let err = Decoder::new(DecoderConfig::default()).err();
    assert_eq!(err, Some(ConfigError::MissingResult));
    assert_eq!(
        Error::from(ConfigError::MissingResult).to_string(),
        "result must be a pointer"
    );
}

#[test]
fn nil_leaves_or_zeroes() {
    let input = Value::new_map(vec![("name", Value::Nil), ("age", Value::Nil)]);

    let mut p = Person {
        name: "kept".into(),
        age: 3,
        emails: vec![],
    };
    decode(&input, &mut p).unwrap();
    assert_eq!(p.name, "kept");
    assert_eq!(p.age, 3);

    let mut md = Metadata::default();
    Decoder::new(DecoderConfig {
        zero_fields: true,
        metadata: Some(&mut md),
        result: Some(&mut p),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap();
    assert_eq!(p.name, "");
    assert_eq!(p.age, 0);
    assert_eq!(md.keys, vec!["name", "age"]);
}

#[test]
fn unused_keys_reported_at_record() {
    let input = Value::new_map(vec![(
        "a",
        Value::new_map(vec![("b", Value::new_map(vec![("c", 1), ("z", 2)]))]),
    )]);
    let mut out = Root::default();
    let err = Decoder::new(DecoderConfig {
        error_unused: true,
        result: Some(&mut out),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(
        err.iter().next().map(|e| e.to_string()),
        Some("a.b: has invalid keys: z".to_string())
    );
}

#[test]
fn custom_tag_name() {
    #[derive(Clone, Default, Debug, PartialEq)]
    struct Tagged {
        id: u32,
    }
    record!(Tagged {
        id: restruct = "ident" json = "ID",
    });

    let input = Value::new_map(vec![("ID", 1), ("ident", 2)]);

    let t: Tagged = input.decode().unwrap();
    assert_eq!(t.id, 2);

    let mut t = Tagged::default();
    Decoder::new(DecoderConfig {
        tag_name: "json".into(),
        result: Some(&mut t),
        ..Default::default()
    })
    .unwrap()
    .decode(&input)
    .unwrap();
    assert_eq!(t.id, 1);
}

#[test]
fn unsupported_destination() {
    let err = Value::from(1).decode::<()>().unwrap_err();
    let e = err.decode_errors().and_then(|e| e.iter().next()).unwrap();
    assert_eq!(e.kind(), ErrorKind::UnsupportedType);
    assert_eq!(e.to_string(), "unsupported type: 'unit'");
}

#[test]
fn dynamic_destination_takes_anything() {
    let v: Value = mitchell().decode().unwrap();
    assert_eq!(v, mitchell());

    let m: HashMap<String, Value> = mitchell().decode().unwrap();
    assert_eq!(m.get("age"), Some(&Value::from(91)));

    let items: Vec<Value> = Value::new_seq(vec![Value::from(1), Value::from("two")])
        .decode()
        .unwrap();
    assert_eq!(items, vec![Value::from(1), Value::from("two")]);

    let maybe: Option<Value> = Value::from(true).decode().unwrap();
    assert_eq!(maybe, Some(Value::Bool(true)));
}
