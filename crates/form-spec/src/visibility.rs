use std::collections::BTreeMap;

use crate::answers::AnswerSet;
use crate::spec::form::FormSchema;

pub type VisibilityMask = BTreeMap<String, bool>;

/// Recomputes the full visibility mask from scratch.
///
/// Groups are always visible. A leaf without a rule is visible; a leaf with a
/// rule is visible exactly while the rule holds for the current answers.
pub fn evaluate(schema: &FormSchema, answers: &AnswerSet) -> VisibilityMask {
    let mut mask = VisibilityMask::new();

    for group in schema.groups() {
        mask.insert(group.id.clone(), true);
    }

    for field in schema.leaves() {
        let visible = match &field.visibility {
            Some(rule) => rule.holds(answers.get(&rule.depends_on)),
            None => true,
        };
        mask.insert(field.id.clone(), visible);
    }

    mask
}

/// Fields missing from the mask count as visible.
pub fn is_visible(mask: &VisibilityMask, field_id: &str) -> bool {
    mask.get(field_id).copied().unwrap_or(true)
}
