#![cfg(test)]

use crate::lexicon::{EntityKind, Lexicon, LexiconBuilder};
use crate::term::{PosTag, BOS_KEY, EOS_KEY};

/// Shared test lexicon for pipeline and recognizer tests.
///
/// Contains a small core vocabulary, a few co-occurrence pairs, tag
/// transitions covering the test sentences, and entity role tables.
pub fn test_lexicon() -> Lexicon {
    use PosTag::*;

    let mut b = LexiconBuilder::new();
    for (word, tag, freq) in [
        ("他", R, 500),
        ("她", R, 300),
        ("我", R, 600),
        ("来自", V, 300),
        ("来", V, 400),
        ("自", P, 200),
        ("中国", Ns, 600),
        ("中", F, 300),
        ("国", N, 200),
        ("美国", Ns, 300),
        ("北京", Ns, 400),
        ("人民", N, 300),
        ("人", N, 400),
        ("民", N, 50),
        ("银行", N, 200),
        ("大学", N, 300),
        ("公司", N, 250),
        ("是", V, 800),
        ("的", U, 1200),
        ("在", P, 500),
        ("在", V, 100),
        ("工作", V, 200),
        ("工作", Vn, 150),
        ("学生", N, 200),
        ("说", V, 400),
        ("去", V, 300),
        ("年", Q, 300),
        ("年", N, 100),
        ("月", N, 200),
        ("日", N, 150),
        ("号", Q, 100),
        ("今天", T, 200),
        ("上午", T, 100),
        ("一", M, 500),
        ("二", M, 100),
        ("三", M, 150),
        ("五", M, 100),
        ("十", M, 100),
        ("百", M, 50),
        ("个", Q, 300),
        ("第", H, 80),
        ("。", W, 1000),
        ("，", W, 900),
        ("！", W, 100),
        ("？", W, 100),
    ] {
        b.word(word, tag, freq);
    }

    for (left, right, freq) in [
        (BOS_KEY, "他", 200),
        ("他", "来自", 40),
        ("来自", "中国", 30),
        ("来自", "美国", 10),
        ("中国", "。", 50),
        ("中国", "人民", 40),
        ("人民", "银行", 30),
        ("。", EOS_KEY, 800),
        ("是", "学生", 20),
        ("学生", "。", 10),
    ] {
        b.bigram(left, right, freq);
    }

    for (left, right, freq) in [
        (Begin, R, 300),
        (Begin, Nr, 100),
        (Begin, Nrf, 20),
        (Begin, T, 80),
        (Begin, M, 50),
        (Begin, N, 100),
        (Begin, Ns, 50),
        (Begin, Nt, 30),
        (R, V, 400),
        (R, P, 200),
        (Nr, V, 150),
        (Nrf, V, 50),
        (Nt, V, 50),
        (Nt, W, 20),
        (V, Ns, 200),
        (V, N, 150),
        (V, Nt, 30),
        (V, P, 20),
        (V, V, 30),
        (P, N, 50),
        (P, Ns, 30),
        (Ns, W, 200),
        (Ns, N, 50),
        (Ns, Nt, 20),
        (Ns, End, 50),
        (N, W, 200),
        (N, V, 100),
        (N, U, 100),
        (N, End, 50),
        (U, N, 200),
        (F, N, 20),
        (M, Q, 200),
        (M, End, 20),
        (Q, N, 100),
        (T, W, 50),
        (T, V, 40),
        (T, R, 30),
        (T, End, 50),
        (W, End, 1000),
    ] {
        b.transition(left, right, freq);
    }

    for (kind, text, freq) in [
        (EntityKind::Surname, "张", 100),
        (EntityKind::Surname, "王", 120),
        (EntityKind::Surname, "李", 110),
        (EntityKind::Surname, "刘", 90),
        (EntityKind::Surname, "欧阳", 20),
        (EntityKind::GivenName, "伟", 50),
        (EntityKind::GivenName, "芳", 40),
        (EntityKind::GivenName, "振", 30),
        (EntityKind::GivenName, "华", 60),
        (EntityKind::GivenName, "明", 50),
        (EntityKind::GivenName, "强", 40),
        (EntityKind::GivenName, "丰", 10),
        (EntityKind::ForeignName, "克", 30),
        (EntityKind::ForeignName, "林", 20),
        (EntityKind::ForeignName, "顿", 30),
        (EntityKind::ForeignName, "斯", 40),
        (EntityKind::ForeignName, "基", 20),
        (EntityKind::ForeignName, "尔", 40),
        (EntityKind::ForeignName, "特", 20),
        (EntityKind::ForeignName, "朗", 20),
        (EntityKind::ForeignName, "普", 20),
        (EntityKind::OrgSuffix, "银行", 50),
        (EntityKind::OrgSuffix, "大学", 60),
        (EntityKind::OrgSuffix, "公司", 80),
    ] {
        b.entity(kind, text, freq);
    }

    b.build()
}
