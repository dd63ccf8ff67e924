#![cfg(feature = "encode")]
use restruct::*;

#[test]
fn eq_nil() {
    let value = Value::enc(&()).unwrap();
    assert!(value.is_nil());
    let value = Value::enc(&Option::<u8>::None).unwrap();
    assert!(value.is_nil());
    let value = Value::enc(&1).unwrap();
    assert!(!value.is_nil());
}

#[test]
fn eq_bool() {
    let value = Value::enc(&true).unwrap();
    assert_eq!(value.bool(), Some(true));
    let value = Value::enc(&false).unwrap();
    assert_eq!(value.bool(), Some(false));
    let value = Value::enc(&1).unwrap();
    assert_eq!(value.bool(), None);
}

#[test]
fn eq_ch() {
    let value = Value::enc(&'a').unwrap();
    assert_eq!(value.str(), Some("a"));
    let value = Value::enc(&1).unwrap();
    assert_eq!(value.str(), None);
}

#[test]
fn eq_unsigned_int() {
    macro_rules! t {
        ($t:ident) => {
            let value = Value::new_num(std::$t::MAX);
            assert_eq!(value.uint(), Some(std::$t::MAX as u128));
            let value = Value::enc(&true).unwrap();
            assert_eq!(value.uint(), None);
        };
    }

    t!(usize);
    t!(u8);
    t!(u16);
    t!(u32);
    t!(u64);
    t!(u128);
}

#[test]
fn eq_signed_int() {
    macro_rules! t {
        ($t:ident) => {
            let value = Value::new_num(std::$t::MAX);
            assert_eq!(value.int(), Some(std::$t::MAX as i128));
            let value = Value::new_num(std::$t::MIN);
            assert_eq!(value.int(), Some(std::$t::MIN as i128));
            let value = Value::enc(&true).unwrap();
            assert_eq!(value.int(), None);
        };
    }

    t!(isize);
    t!(i8);
    t!(i16);
    t!(i32);
    t!(i64);
    t!(i128);
}

#[test]
fn eq_float() {
    macro_rules! inner {
        ($v:expr) => {
            let as_f64 = $v.to_string().parse::<f64>().expect("shouldn't fail");
            let value = Value::new_num($v);
            assert_eq!(value.float(), Some(as_f64));
            let value = Value::enc(&true).unwrap();
            assert_eq!(value.float(), None);
        };
    }

    macro_rules! t {
        ($t:ident) => {
            inner!(std::$t::EPSILON);
            inner!(std::$t::MAX);
            inner!(std::$t::MIN);
            inner!(std::$t::MIN_POSITIVE);
            inner!(std::$t::consts::FRAC_1_PI);
            inner!(std::$t::consts::FRAC_2_PI);
            inner!(std::$t::consts::FRAC_2_SQRT_PI);
            inner!(std::$t::consts::FRAC_1_SQRT_2);
            inner!(std::$t::consts::FRAC_PI_2);
            inner!(std::$t::consts::FRAC_PI_3);
            inner!(std::$t::consts::FRAC_PI_4);
            inner!(std::$t::consts::FRAC_PI_6);
            inner!(std::$t::consts::FRAC_PI_8);
            inner!(std::$t::consts::LN_2);
            inner!(std::$t::consts::LN_10);
            inner!(std::$t::consts::LOG2_E);
            inner!(std::$t::consts::LOG10_E);
            inner!(std::$t::consts::PI);
            inner!(std::$t::consts::SQRT_2);
        };
    }

    t!(f32);
    t!(f64);

    // edge case where 3.14f32 as f64 != 3.14f64
    let value = Value::enc(&1.2345678f32).unwrap();
    assert_eq!(value.float(), Some(1.2345678));

    // inifities and nans work
    let value = Value::new_num(std::f32::INFINITY);
    assert_eq!(value.float(), Some(std::f64::INFINITY));
    let value = Value::new_num(std::f64::INFINITY);
    assert_eq!(value.float(), Some(std::f64::INFINITY));

    let value = Value::new_num(std::f32::NEG_INFINITY);
    assert_eq!(value.float(), Some(std::f64::NEG_INFINITY));
    let value = Value::new_num(std::f64::NEG_INFINITY);
    assert_eq!(value.float(), Some(std::f64::NEG_INFINITY));

    let value = Value::new_num(std::f32::NAN);
    assert!(value.float().unwrap().is_nan());
    let value = Value::new_num(std::f64::NAN);
    assert!(value.float().unwrap().is_nan());
}

#[test]
fn eq_str() {
    let s = "Hello, world!".to_string();
    let value = Value::enc(&s).unwrap();
    assert_eq!(value.str(), Some("Hello, world!"));
    let value = Value::enc(&true).unwrap();
    assert_eq!(value.str(), None);
}

#[test]
fn eq_barr() {
    let arr: [u8; 5] = [1, 2, 3, 4, 5];
    let v: Vec<u8> = vec![1, 2, 3, 4, 5];
    let value = Value::new_bytes(v.as_slice());
    assert_eq!(value.bytes(), Some(&arr[..]));
    let value = Value::enc(&true).unwrap();
    assert_eq!(value.bytes(), None);
}
