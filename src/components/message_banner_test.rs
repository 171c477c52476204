use super::*;

#[test]
fn banner_text_and_class() {
    let ok = Banner::Success("Saved.".to_owned());
    let err = Banner::Error("Failed.".to_owned());
    assert_eq!(ok.text(), "Saved.");
    assert_eq!(err.text(), "Failed.");
    assert_eq!(ok.class(), "banner banner--success");
    assert_eq!(err.class(), "banner banner--error");
}
