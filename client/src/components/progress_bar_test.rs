use super::*;

#[test]
fn fill_style_clamps_and_colours() {
    assert_eq!(fill_style(42, None), "width: 42%");
    assert_eq!(fill_style(250, None), "width: 100%");
    assert_eq!(fill_style(10, Some("#22c55e")), "width: 10%; background-color: #22c55e");
}
