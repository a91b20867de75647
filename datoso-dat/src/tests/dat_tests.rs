use super::*;

#[test]
fn test_classification_path_skips_empty_segments() {
    let classification = Classification {
        prefix: Some("Consoles".into()),
        company: Some("Nintendo".into()),
        system: Some(String::new()),
        suffixes: vec!["Game Boy".into(), String::new(), "Private".into()],
        ..Classification::default()
    };
    assert_eq!(
        classification.path(),
        PathBuf::from("Consoles").join("Nintendo").join("Game Boy").join("Private")
    );
    assert_eq!(Classification::default().path(), PathBuf::new());
}

#[test]
fn test_classification_overrides_only_filled_values() {
    let mut classification = Classification {
        company: Some("Nintendo".into()),
        system: Some("GB".into()),
        ..Classification::default()
    };
    let overrides = Classification {
        system: Some("Game Boy".into()),
        company: Some(String::new()),
        system_type: Some("Console".into()),
        ..Classification::default()
    };
    classification.apply(&overrides);
    assert_eq!(classification.company.as_deref(), Some("Nintendo"));
    assert_eq!(classification.system.as_deref(), Some("Game Boy"));
    assert_eq!(classification.system_type.as_deref(), Some("Console"));
}

#[test]
fn test_summary() {
    let mut dat = DatFile::new(DatFormat::Xml, "Nintendo - Game Boy");
    dat.header.insert("description".into(), "Nintendo - Game Boy (20240101)".into());
    dat.header.insert("date".into(), "20240101".into());
    dat.file = Some(PathBuf::from("/dats/gb.dat"));
    dat.classification = Classification {
        seed: Some("nointro".into()),
        company: Some("Nintendo".into()),
        system: Some("Game Boy".into()),
        ..Classification::default()
    };

    let summary = dat.summary();
    assert_eq!(summary.name, "Nintendo - Game Boy");
    assert_eq!(summary.full_name.as_deref(), Some("Nintendo - Game Boy (20240101)"));
    assert_eq!(summary.date.as_deref(), Some("20240101"));
    assert_eq!(summary.seed.as_deref(), Some("nointro"));
    assert_eq!(summary.path, PathBuf::from("Nintendo").join("Game Boy").display().to_string());

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["name"], "Nintendo - Game Boy");
    assert_eq!(json["file"], "/dats/gb.dat");
    assert!(json["modifier"].is_null());
}

#[test]
fn test_version_prefers_classification() {
    let mut dat = DatFile::new(DatFormat::ClrMamePro, "Test");
    dat.header.insert("version".into(), "1".into());
    assert_eq!(dat.version(), Some("1"));
    dat.classification.version = Some("2".into());
    assert_eq!(dat.version(), Some("2"));
}

#[test]
fn test_rom_set_attribute_routing() {
    let mut rom = Rom::default();
    rom.set_attribute("name", "a.bin".into()).unwrap();
    rom.set_attribute("size", "42".into()).unwrap();
    rom.set_attribute("crc32", "ABCDEF01".into()).unwrap();
    rom.set_attribute("sha256", "FF".into()).unwrap();
    rom.set_attribute("md5", String::new()).unwrap();
    rom.set_attribute("status", "baddump".into()).unwrap();
    rom.set_attribute("mia", "yes".into()).unwrap();

    assert_eq!(rom.name, "a.bin");
    assert_eq!(rom.size, Some(42));
    assert_eq!(rom.hash(HashKind::Crc32), Some("abcdef01"));
    assert_eq!(rom.hash(HashKind::Sha256), Some("ff"));
    assert_eq!(rom.hash(HashKind::Md5), None);
    assert_eq!(rom.get("status"), Some("baddump"));
    assert!(rom.mia);

    assert!(rom.set_attribute("size", "-1".into()).is_err());
}

#[test]
fn test_attribute_map_uses_at_prefix() {
    let rom = Rom::new("a.bin")
        .with_size(4)
        .with_hash(HashKind::Sha1, "ABC")
        .with_hash(HashKind::Crc32, "0001");
    let map = rom.attribute_map();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["@name", "@size", "@crc", "@sha1"]);
    assert_eq!(map["@sha1"], "abc");
}

#[test]
fn test_hash_kind_names() {
    assert_eq!(HashKind::from_attribute("crc"), Some(HashKind::Crc32));
    assert_eq!(HashKind::from_attribute("crc32"), Some(HashKind::Crc32));
    assert_eq!(HashKind::from_attribute("size"), None);
    assert_eq!(HashKind::Crc32.to_string(), "crc");
    assert_eq!(serde_json::to_string(&HashKind::Crc32).unwrap(), "\"crc\"");
    assert_eq!(serde_json::to_string(&HashKind::Sha256).unwrap(), "\"sha256\"");
}

#[test]
fn test_save_without_path() {
    let dat = DatFile::new(DatFormat::Xml, "Memory");
    assert!(matches!(dat.save(), Err(DatError::NoPath)));
}
