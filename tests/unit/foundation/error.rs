use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ExportError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ExportError::resource("x")
            .to_string()
            .contains("missing resource:")
    );
    assert!(
        ExportError::process("x")
            .to_string()
            .contains("process error:")
    );
    assert!(
        ExportError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn unknown_material_type_names_material_and_kind() {
    let msg = ExportError::unknown_material_type("Steel", "BRDFMystery").to_string();
    assert!(msg.contains("Steel"));
    assert!(msg.contains("BRDFMystery"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ExportError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
