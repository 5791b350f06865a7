use super::*;

#[test]
fn parses_six_and_eight_digit_forms() {
    assert_eq!(parse_hex("#FF00aa").unwrap(), Rgba8::rgb(255, 0, 170));
    assert_eq!(
        parse_hex("0f172a22").unwrap(),
        Rgba8::rgb(15, 23, 42).with_alpha(0x22)
    );
}

#[test]
fn rejects_bad_lengths_and_digits() {
    assert!(parse_hex("#fff").is_err());
    assert!(parse_hex("#gg0000").is_err());
    assert!(parse_hex("#ffé000").is_err());
}

#[test]
fn strict_hex_check() {
    assert!(is_hex_color("#0ea5e9"));
    assert!(!is_hex_color("0ea5e9"));
    assert!(!is_hex_color("#0ea5e"));
    assert!(!is_hex_color("#0ea5eZ"));
}

#[test]
fn lerp_endpoints_and_midpoint() {
    let a = Rgba8::rgb(0, 0, 0);
    let b = Rgba8::rgb(200, 100, 50);
    assert_eq!(lerp(a, b, 0.0), a);
    assert_eq!(lerp(a, b, 1.0), b);
    assert_eq!(lerp(a, b, 0.5), Rgba8::rgb(100, 50, 25));
}
