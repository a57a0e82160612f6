use super::*;
use crate::foundation::core::{AColor, Color};

#[test]
fn record_layout_is_type_name_fields_and_blank_line() {
    let rec = Record::new("LightOmni", "LALamp")
        .with("enabled", true)
        .with("intensity", 2.0)
        .with("color", Color(1.0, 0.0, 0.0));
    let text = Formatter::plain().render(&rec);
    assert_eq!(
        text,
        "LightOmni LALamp {\n\tenabled= 1;\n\tintensity= 2.000000;\n\tcolor= Color(1.000000,0.000000,0.000000);\n}\n\n"
    );
}

#[test]
fn unnamed_record_and_comment() {
    let rec = Record::unnamed("SettingsOptions")
        .with("mtl_maxDepth", 1)
        .with_comment("PREVIEW");
    let text = Formatter::plain().render(&rec);
    assert!(text.starts_with("SettingsOptions { // PREVIEW\n"));
}

#[test]
fn values_render_in_target_grammar() {
    assert_eq!(format_value(&Value::reference("MAsteel")), "MAsteel");
    assert_eq!(format_value(&Value::quoted("a/b.ies")), "\"a/b.ies\"");
    assert_eq!(
        format_value(&Value::output("TEnoise", "out_intensity")),
        "TEnoise::out_intensity"
    );
    assert_eq!(
        format_value(&Value::AColor(AColor(0.5, 0.5, 0.5, 1.0))),
        "AColor(0.500000,0.500000,0.500000,1.000000)"
    );
    assert_eq!(
        format_value(&Value::Vector(DVec3::new(1.0, 2.0, 3.0))),
        "Vector(1.000000, 2.000000, 3.000000)"
    );
    assert_eq!(
        format_value(&Value::ref_list(["A", "B"])),
        "List(A,B)"
    );
}

#[test]
fn transform_writes_columns_then_offset() {
    let m = DMat4::from_translation(DVec3::new(4.0, 5.0, 6.0));
    assert_eq!(
        format_value(&Value::Transform(m)),
        "Transform(Matrix(Vector(1.000000, 0.000000, 0.000000),Vector(0.000000, 1.000000, 0.000000),Vector(0.000000, 0.000000, 1.000000)),Vector(4.000000, 5.000000, 6.000000))"
    );
}

#[test]
fn interpolation_wraps_scalars_but_not_strings_or_lists() {
    let f = Formatter::interpolated(FrameNumber(12));
    assert_eq!(f.field_value(&Value::Float(1.0)), "interpolate((12,1.000000))");
    assert_eq!(f.field_value(&Value::quoted("x")), "\"x\"");
    assert_eq!(f.field_value(&Value::ref_list(["A"])), "List(A)");
}
