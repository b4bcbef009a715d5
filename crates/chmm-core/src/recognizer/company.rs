use std::sync::Arc;

use tracing::trace;

use crate::lexicon::{EntityKind, Lexicon};
use crate::settings::settings;
use crate::term::{PosTag, Term};
use crate::tokenizer::{TermGraph, TermPath};

use super::{with_variants, Recognizer};

/// Proposes organization names ending in a known suffix (`银行`, `大学`, ...).
///
/// One path per prefix length: for `中国 人民 银行` both `人民银行` and
/// `中国人民银行` are proposed.
pub struct CompanyRecognizer {
    lexicon: Arc<Lexicon>,
}

impl CompanyRecognizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }
}

/// Categories that may appear inside an organization name before its suffix.
fn is_nameable(tag: PosTag) -> bool {
    matches!(
        tag,
        PosTag::N
            | PosTag::Ns
            | PosTag::Nz
            | PosTag::Nt
            | PosTag::Nx
            | PosTag::Nr
            | PosTag::Nrf
            | PosTag::X
    )
}

impl Recognizer for CompanyRecognizer {
    fn name(&self) -> &'static str {
        "company"
    }

    fn process(&self, graph: &TermGraph) -> Vec<TermPath> {
        let Some(base) = graph.base_path() else {
            return Vec::new();
        };
        let s = &settings().recognizer;
        let terms = base.inner();

        let mut variants = Vec::new();
        for (j, suffix) in terms.iter().enumerate() {
            if !self.lexicon.is_entity(EntityKind::OrgSuffix, &suffix.surface) {
                continue;
            }
            let cost = s.org_penalty + self.lexicon.role_cost(EntityKind::OrgSuffix, &suffix.surface);
            for k in 1..=s.org_max_prefix_terms.min(j) {
                let first = &terms[j - k];
                if !is_nameable(first.tag) {
                    break;
                }
                let surface = graph.slice(first.start, suffix.end);
                trace!(surface = %surface, "organization candidate");
                variants.extend(graph.splice(Term::new(surface, first.start, PosTag::Nt, cost)));
            }
        }
        with_variants(base, variants)
    }
}
