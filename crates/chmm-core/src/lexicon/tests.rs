use std::fs;

use super::*;
use crate::term::{BOS_KEY, EOS_KEY};
use crate::tokenizer::testutil::test_lexicon;

fn write_source(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

const CORE: &str = "\
# word\ttag\tfreq
中国\tns\t600
在\tp\t500
在\tv\t100
来自\tv\t300
";

#[test]
fn test_builder_sorts_entries_by_frequency() {
    let mut b = LexiconBuilder::new();
    b.word("在", PosTag::V, 100)
        .word("在", PosTag::P, 500)
        .word("在", PosTag::V, 20);
    let lex = b.build();
    assert_eq!(
        lex.entries("在"),
        &[
            LexEntry { tag: PosTag::P, freq: 500 },
            LexEntry { tag: PosTag::V, freq: 120 },
        ]
    );
    assert_eq!(lex.dominant_tag("在"), Some(PosTag::P));
    assert_eq!(lex.frequency("在"), 620);
    assert_eq!(lex.total_frequency(), 620);
}

#[test]
fn test_builder_ignores_empty_words() {
    let mut b = LexiconBuilder::new();
    b.word("", PosTag::N, 10).entity(EntityKind::Surname, "", 5);
    let lex = b.build();
    assert_eq!(lex.word_count(), 0);
    assert_eq!(lex.stats().entities, 0);
}

#[test]
fn test_prefix_lengths() {
    let lex = test_lexicon();
    let chars: Vec<char> = "中国人民银行".chars().collect();
    assert_eq!(lex.prefix_lengths(&chars), vec![1, 2]);
    assert_eq!(lex.prefix_lengths(&chars[2..]), vec![1, 2]);
    assert!(lex.prefix_lengths(&[]).is_empty());
    assert!(lex.prefix_lengths(&['犇']).is_empty());
}

#[test]
fn test_cooccurrence_and_transitions() {
    let lex = test_lexicon();
    assert_eq!(lex.cooccurrence("他", "来自"), 40);
    assert_eq!(lex.cooccurrence(BOS_KEY, "他"), 200);
    assert_eq!(lex.cooccurrence("。", EOS_KEY), 800);
    assert_eq!(lex.cooccurrence("来自", "他"), 0);
    assert_eq!(lex.transition(PosTag::R, PosTag::V), 400);
    assert_eq!(lex.transition(PosTag::V, PosTag::R), 0);
    assert_eq!(lex.transition_total(PosTag::R), 600);
}

#[test]
fn test_entity_tables() {
    let lex = test_lexicon();
    assert!(lex.is_entity(EntityKind::Surname, "欧阳"));
    assert!(!lex.is_entity(EntityKind::Surname, "伟"));
    assert_eq!(lex.max_entity_chars(EntityKind::Surname), 2);
    assert_eq!(lex.entity_freq(EntityKind::OrgSuffix, "公司"), 80);
}

#[test]
fn test_role_cost_prefers_role_only_chars() {
    let lex = test_lexicon();
    // 振 appears only as a given-name char, 国 is mostly an ordinary word.
    let mut b = LexiconBuilder::new();
    b.word("国", PosTag::N, 200)
        .entity(EntityKind::GivenName, "国", 10)
        .entity(EntityKind::GivenName, "振", 30);
    let own = b.build();
    assert!(own.role_cost(EntityKind::GivenName, "振") < own.role_cost(EntityKind::GivenName, "国"));
    assert!(lex.role_cost(EntityKind::Surname, "张") > 0.0);
}

#[test]
fn test_entity_kind_parse() {
    for kind in EntityKind::ALL {
        assert_eq!(kind.as_str().parse::<EntityKind>(), Ok(kind));
    }
    assert!("nickname".parse::<EntityKind>().is_err());
}

#[test]
fn test_from_dir_full_source() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        &[
            ("core.dic", CORE),
            ("bigram.dic", "<s>\t中国\t5\n中国\t</s>\t3\n"),
            ("tags.tr", "begin\tns\t10\nns\tend\t7\n"),
            ("entity.dic", "surname\t欧阳\t20\norg_suffix\t银行\t50\n"),
        ],
    );
    let lex = Lexicon::load(dir.path()).unwrap();
    assert_eq!(lex.word_count(), 3);
    assert_eq!(lex.dominant_tag("在"), Some(PosTag::P));
    assert_eq!(lex.cooccurrence(BOS_KEY, "中国"), 5);
    assert_eq!(lex.transition(PosTag::Begin, PosTag::Ns), 10);
    assert_eq!(lex.transition(PosTag::Ns, PosTag::End), 7);
    assert!(lex.is_entity(EntityKind::OrgSuffix, "银行"));
    assert_eq!(lex.max_word_chars(), 2);
}

#[test]
fn test_from_dir_optional_files_missing() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), &[("core.dic", CORE)]);
    let lex = Lexicon::from_dir(dir.path()).unwrap();
    assert_eq!(lex.stats().bigrams, 0);
    assert_eq!(lex.stats().transitions, 0);
    assert_eq!(lex.stats().entities, 0);
}

#[test]
fn test_from_dir_missing_core() {
    let dir = tempfile::tempdir().unwrap();
    let err = Lexicon::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LexiconError::NotFound(p) if p.ends_with("core.dic")));
}

#[test]
fn test_load_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Lexicon::load(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, LexiconError::NotFound(_)));
}

#[test]
fn test_parse_errors_report_line() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), &[("core.dic", "中国\tns\t600\n\n来自\tv\n")]);
    match Lexicon::from_dir(dir.path()).unwrap_err() {
        LexiconError::Parse { file, line, .. } => {
            assert_eq!(file, "core.dic");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_rejects_bad_fields() {
    let cases = [
        ("core.dic", "中国\tzz\t600\n"),
        ("core.dic", "中国\tns\tmany\n"),
        ("core.dic", "中国\tbegin\t600\n"),
    ];
    for (name, content) in cases {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &[(name, content)]);
        assert!(
            matches!(Lexicon::from_dir(dir.path()), Err(LexiconError::Parse { .. })),
            "{content:?} should not parse"
        );
    }

    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), &[("core.dic", CORE), ("entity.dic", "nickname\t小\t1\n")]);
    assert!(matches!(
        Lexicon::from_dir(dir.path()),
        Err(LexiconError::Parse { .. })
    ));
}

#[test]
fn test_binary_round_trip() {
    let lex = test_lexicon();
    let restored = Lexicon::from_bytes(&lex.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.stats(), lex.stats());
    assert_eq!(restored.entries("在"), lex.entries("在"));
    assert_eq!(restored.cooccurrence("他", "来自"), 40);
    assert_eq!(restored.max_entity_chars(EntityKind::Surname), 2);
}

#[test]
fn test_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.chlx");
    test_lexicon().save(&path).unwrap();
    let lex = Lexicon::load(&path).unwrap();
    assert_eq!(lex.dominant_tag("中国"), Some(PosTag::Ns));
}

#[test]
fn test_from_bytes_rejects_bad_header() {
    assert!(matches!(
        Lexicon::from_bytes(b"CH"),
        Err(LexiconError::InvalidHeader)
    ));
    assert!(matches!(
        Lexicon::from_bytes(b"NOPE\x01\0\0\0\0\0\0\0\0"),
        Err(LexiconError::InvalidMagic)
    ));
    assert!(matches!(
        Lexicon::from_bytes(b"CHLX\x09\0\0\0\0\0\0\0\0"),
        Err(LexiconError::UnsupportedVersion(9))
    ));

    let mut bytes = test_lexicon().to_bytes().unwrap();
    bytes.truncate(bytes.len() - 1);
    assert!(matches!(
        Lexicon::from_bytes(&bytes),
        Err(LexiconError::InvalidHeader)
    ));
}

#[test]
fn test_from_bytes_detects_corruption() {
    let mut bytes = test_lexicon().to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        Lexicon::from_bytes(&bytes),
        Err(LexiconError::ChecksumMismatch { .. })
    ));
}
