use super::*;
use crate::dat::HashKind;
use crate::format::DatFormat;

fn rom(name: &str, size: u64, kind: HashKind, digest: &str) -> Rom {
    Rom::new(name).with_size(size).with_hash(kind, digest)
}

fn dat_with(name: &str, games: Vec<Game>) -> DatFile {
    let mut dat = DatFile::new(DatFormat::Xml, name);
    dat.games = games;
    dat
}

fn rom_names(dat: &DatFile) -> Vec<&str> {
    dat.roms().map(|r| r.name.as_str()).collect()
}

#[test]
fn test_merge_with_parent() {
    let parent = dat_with(
        "Parent",
        vec![Game::new("A").with_rom(rom("a.bin", 100, HashKind::Sha1, "aaa"))],
    );
    let mut child = dat_with(
        "Child",
        vec![
            Game::new("AB")
                .with_rom(rom("a.bin", 100, HashKind::Sha1, "aaa"))
                .with_rom(rom("b.bin", 50, HashKind::Sha1, "bbb")),
        ],
    );

    let outcome = child.merge_with(&parent);
    assert_eq!(outcome.count, 1);
    assert_eq!(outcome.removed[0].name, "a.bin");
    assert_eq!(rom_names(&child), vec!["b.bin"]);
    // Parent is untouched
    assert_eq!(parent.rom_count(), 1);
}

#[test]
fn test_self_dedupe_first_occurrence_wins() {
    let mut dat = dat_with(
        "Self",
        vec![
            Game::new("First").with_rom(rom("x.bin", 10, HashKind::Crc32, "deadbeef")),
            Game::new("Second").with_rom(rom("x.bin", 10, HashKind::Crc32, "deadbeef")),
        ],
    );

    let outcome = dat.dedupe();
    assert_eq!(outcome.count, 1);
    assert_eq!(dat.games[0].roms.len(), 1);
    assert!(dat.games[1].roms.is_empty());
    // The emptied game is kept for its metadata
    assert_eq!(dat.games.len(), 2);
    assert_eq!(dat.games[1].name(), Some("Second"));
}

#[test]
fn test_self_dedupe_is_idempotent() {
    let mut dat = dat_with(
        "Self",
        vec![
            Game::new("One")
                .with_rom(rom("a.bin", 1, HashKind::Sha1, "s-a"))
                .with_rom(rom("a-copy.bin", 1, HashKind::Sha1, "s-a")),
            Game::new("Two")
                .with_rom(rom("a-again.bin", 1, HashKind::Sha1, "s-a"))
                .with_rom(rom("b.bin", 2, HashKind::Sha1, "s-b")),
        ],
    );

    assert_eq!(dat.dedupe().count, 2);
    assert_eq!(rom_names(&dat), vec!["a.bin", "b.bin"]);
    assert_eq!(dat.dedupe().count, 0);
    assert_eq!(rom_names(&dat), vec!["a.bin", "b.bin"]);
}

#[test]
fn test_same_hash_different_size_is_kept() {
    let parent = dat_with(
        "Parent",
        vec![Game::new("A").with_rom(rom("a.bin", 100, HashKind::Sha1, "aaa"))],
    );
    let mut child = dat_with(
        "Child",
        vec![Game::new("A").with_rom(rom("a.bin", 200, HashKind::Sha1, "aaa"))],
    );
    assert_eq!(child.merge_with(&parent).count, 0);
    assert_eq!(child.rom_count(), 1);
}

#[test]
fn test_md5_only_match_is_a_duplicate() {
    let parent = dat_with(
        "Parent",
        vec![Game::new("A").with_rom(
            Rom::new("a.bin")
                .with_size(64)
                .with_hash(HashKind::Sha1, "sha-parent")
                .with_hash(HashKind::Md5, "md5-shared"),
        )],
    );
    let mut child = dat_with(
        "Child",
        vec![
            Game::new("Differs").with_rom(
                Rom::new("a.bin")
                    .with_size(64)
                    .with_hash(HashKind::Sha1, "sha-child")
                    .with_hash(HashKind::Md5, "md5-shared"),
            ),
            Game::new("Absent").with_rom(rom("a2.bin", 64, HashKind::Md5, "md5-shared")),
        ],
    );
    assert_eq!(child.merge_with(&parent).count, 2);
    assert_eq!(child.rom_count(), 0);
}

#[test]
fn test_merge_does_not_dedupe_child_against_itself() {
    let parent = dat_with("Parent", Vec::new());
    let mut child = dat_with(
        "Child",
        vec![
            Game::new("One").with_rom(rom("x.bin", 1, HashKind::Crc32, "00000001")),
            Game::new("Two").with_rom(rom("x.bin", 1, HashKind::Crc32, "00000001")),
        ],
    );
    assert_eq!(child.merge_with(&parent).count, 0);
    assert_eq!(child.rom_count(), 2);
}

#[test]
fn test_roms_without_hashes_are_never_removed() {
    let mut dat = dat_with(
        "NoHash",
        vec![
            Game::new("One").with_rom(Rom::new("same.bin").with_size(1)),
            Game::new("Two").with_rom(Rom::new("same.bin").with_size(1)),
        ],
    );
    assert_eq!(dat.dedupe().count, 0);
    assert_eq!(dat.rom_count(), 2);
}

#[test]
fn test_games_without_roms_are_skipped() {
    let mut dat = dat_with(
        "Devices",
        vec![
            Game::new("Device"),
            Game::new("Real").with_rom(rom("r.bin", 1, HashKind::Sha1, "r")),
        ],
    );
    let outcome = dat.dedupe();
    assert_eq!(outcome.count, 0);
    assert_eq!(dat.games.len(), 2);
    assert_eq!(dat.games[0].name(), Some("Device"));
}

#[test]
fn test_partition_is_pure() {
    let games = vec![
        Game::new("One").with_rom(rom("a.bin", 1, HashKind::Sha1, "s")),
        Game::new("Two").with_rom(rom("b.bin", 1, HashKind::Sha1, "s")),
    ];
    let partition = partition_self(games);
    assert_eq!(partition.count(), 1);
    assert_eq!(partition.kept.len(), 2);
    assert_eq!(partition.removed[0].name, "b.bin");

    let mut index = HashIndex::new();
    index.add_rom(&rom("p.bin", 1, HashKind::Sha1, "s"));
    let partition = partition_against(partition.kept, &index);
    assert_eq!(partition.count(), 1);
    assert!(partition.kept.iter().all(|g| g.roms.is_empty()));
}

#[test]
fn test_dedupe_works_for_text_dialects() {
    let text = "clrmamepro (\n\tname \"Test\"\n\tdescription \"Test\"\n)\n\ngame (\n\tname \"One\"\n\trom ( name a.bin size 4 crc 0000000A )\n)\n\ngame (\n\tname \"Two\"\n\trom ( name a.bin size 4 crc 0000000a )\n)\n";
    let mut dat = DatFile::parse_str(DatFormat::ClrMamePro, text, None).unwrap();
    assert_eq!(dat.dedupe().count, 1);
    assert_eq!(dat.rom_count(), 1);
}

// -- references and sessions --

#[test]
fn test_dat_ref_parsing() {
    match "No-Intro:Nintendo - Game Boy".parse::<DatRef>().unwrap() {
        DatRef::Named { seed, name } => {
            assert_eq!(seed, "No-Intro");
            assert_eq!(name, "Nintendo - Game Boy");
        }
        other => panic!("unexpected reference: {other:?}"),
    }
    assert!(matches!(
        "parents/nes.dat".parse::<DatRef>().unwrap(),
        DatRef::Path(_)
    ));
    assert!(matches!(
        "parents/nes.xml".parse::<DatRef>().unwrap(),
        DatRef::Path(_)
    ));
    assert!(matches!(
        "parents/nes.txt".parse::<DatRef>(),
        Err(DatError::InvalidReference(_))
    ));
}

#[test]
fn test_no_lookup_fails() {
    let reference = DatRef::Named {
        seed: "redump".into(),
        name: "Sony - PlayStation".into(),
    };
    assert!(matches!(reference.load(&NoLookup), Err(DatError::Lookup(_))));
}

#[test]
fn test_session_accumulates_merged_roms() {
    let parent = dat_with(
        "Parent",
        vec![Game::new("A").with_rom(rom("a.bin", 100, HashKind::Sha1, "aaa"))],
    );
    let child = dat_with(
        "Child",
        vec![
            Game::new("AB")
                .with_rom(rom("a.bin", 100, HashKind::Sha1, "aaa"))
                .with_rom(rom("b.bin", 50, HashKind::Sha1, "bbb")),
        ],
    );
    let mut session = Dedupe::new(child.into(), Some(parent.into()), &NoLookup).unwrap();
    assert_eq!(session.run(), 1);
    assert_eq!(session.merged_roms()[0].name, "a.bin");
    assert_eq!(session.child().rom_count(), 1);
    // Nothing left to remove; the running total stays put.
    assert_eq!(session.run(), 1);
}

#[test]
fn test_session_without_parent_self_dedupes() {
    let child = dat_with(
        "Child",
        vec![
            Game::new("One").with_rom(rom("x.bin", 10, HashKind::Crc32, "deadbeef")),
            Game::new("Two").with_rom(rom("x.bin", 10, HashKind::Crc32, "deadbeef")),
        ],
    );
    let mut session = Dedupe::from_dats(child, None);
    assert!(session.parent().is_none());
    assert_eq!(session.run(), 1);
    assert_eq!(session.into_child().games[1].roms.len(), 0);
}

#[test]
fn test_session_save_without_path() {
    let mut session = Dedupe::from_dats(dat_with("Memory", Vec::new()), None);
    session.run();
    assert!(matches!(session.save(None), Err(DatError::NoPath)));
}
