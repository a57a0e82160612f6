use super::*;
use crate::vrscene::format::Formatter;
use crate::vrscene::record::Record;

#[test]
fn scan_reads_back_formatted_records() {
    let f = Formatter::plain();
    let mut text = String::from("// Lights\n");
    text.push_str(&f.render(&Record::new("LightOmni", "LAa").with("intensity", 3.0)));
    text.push_str(&f.render(&Record::unnamed("SettingsOptions").with("gi_dontRenderImage", false)));
    text.push_str("#include \"scene_lights.vrscene\"\n");

    let doc = scan(&text).unwrap();
    assert_eq!(doc.records.len(), 2);
    assert_eq!(doc.records[0].plugin, "LightOmni");
    assert_eq!(doc.records[0].get("intensity"), Some("3.000000"));
    assert_eq!(doc.records[1].name, None);
    assert_eq!(doc.includes, vec!["scene_lights.vrscene".to_string()]);
    assert!(doc.find("LightOmni", "LAa").is_some());
}

#[test]
fn scan_accepts_header_comments() {
    let doc = scan("LightSpot LALamp_002 { // PREVIEW\n\tdecay= 1.0;\n}\n").unwrap();
    assert_eq!(doc.records[0].name.as_deref(), Some("LALamp_002"));
}

#[test]
fn scan_rejects_unterminated_record() {
    let err = scan("TexChecker TEx {\n\tuvwgen= DEFAULTUVWC;\n").unwrap_err();
    assert!(err.to_string().contains("unterminated"));
}

#[test]
fn scan_strips_trailing_include_comments() {
    let doc = scan("#include \"//host/VRAYDR/a.vrscene\"\t\t // Props\n").unwrap();
    assert_eq!(doc.includes, vec!["//host/VRAYDR/a.vrscene".to_string()]);
}
