#![forbid(unsafe_code)]

use super::diff::{FormDiff, OptionDiff, OptionUpdate, QuestionUpdate, QuestionUpdateBody};
use super::types::{Form, FormHeader, OptionDefinition, QuestionDefinition, QuestionType};
use super::validate::{
    SchemaViolation, check_range, duplicate_label, first_duplicate, validate_header,
    validate_questions,
};
use crate::ids::{OptionId, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Form,
    Question,
    Option,
    Respondent,
    Response,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Question => "question",
            Self::Option => "option",
            Self::Respondent => "respondent",
            Self::Response => "response",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An update/delete target that is not part of the persisted form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{entity} {id} not found for update/delete")]
pub struct ReferentialError {
    pub entity: EntityKind,
    pub id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Structural(#[from] SchemaViolation),
    #[error(transparent)]
    Referential(#[from] ReferentialError),
}

/// Identifier lookup of what is currently stored for one form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedSchema {
    pub questions: BTreeMap<QuestionId, PersistedQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedQuestion {
    pub order: u32,
    pub options: BTreeMap<OptionId, PersistedOption>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedOption {
    pub order: u32,
    pub label: String,
}

impl PersistedSchema {
    pub fn from_form(form: &Form) -> Self {
        let questions = form
            .questions
            .iter()
            .map(|question| {
                let options = question
                    .kind
                    .options()
                    .iter()
                    .map(|option| {
                        (
                            option.id,
                            PersistedOption {
                                order: option.order,
                                label: option.label.clone(),
                            },
                        )
                    })
                    .collect();
                (
                    question.id,
                    PersistedQuestion {
                        order: question.order,
                        options,
                    },
                )
            })
            .collect();
        Self { questions }
    }
}

/// A diff whose self-contained rules already hold. Obtained from
/// [`FormDiff::check`]; only lookup-dependent rules remain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedDiff {
    diff: FormDiff,
}

impl FormDiff {
    /// Checks every rule that needs no persisted state: the header, the new
    /// questions as a standalone set, and how updated questions relate to the
    /// new ones and to the delete set.
    pub fn check(self) -> Result<CheckedDiff, SchemaViolation> {
        validate_header(&self.header)?;
        validate_questions(&self.new_questions)?;

        let new_orders: BTreeSet<u32> = self.new_questions.iter().map(|q| q.order).collect();
        let deleted: BTreeSet<QuestionId> = self.deleted_questions.iter().copied().collect();

        if let Some(id) = first_duplicate(self.updated_questions.iter().map(|q| q.id)) {
            return Err(SchemaViolation::DuplicateQuestionUpdate { id });
        }
        for update in &self.updated_questions {
            if deleted.contains(&update.id) {
                return Err(SchemaViolation::QuestionUpdatedAndDeleted { id: update.id });
            }
            if new_orders.contains(&update.order) {
                return Err(SchemaViolation::QuestionOrderCollision {
                    order: update.order,
                });
            }
        }
        if let Some(order) = first_duplicate(self.updated_questions.iter().map(|q| q.order)) {
            return Err(SchemaViolation::DuplicateQuestionOrder { order });
        }

        for update in &self.updated_questions {
            check_update_shape(update)?;
        }

        Ok(CheckedDiff { diff: self })
    }
}

fn check_update_shape(update: &QuestionUpdate) -> Result<(), SchemaViolation> {
    if update.prompt.trim().is_empty() {
        return Err(SchemaViolation::EmptyPrompt {
            order: update.order,
        });
    }
    match &update.body {
        QuestionUpdateBody::Text => Ok(()),
        QuestionUpdateBody::Range { from, to } => check_range(update.order, *from, *to).map(|_| ()),
        QuestionUpdateBody::Radio { options } | QuestionUpdateBody::Checkbox { options } => {
            check_option_diff_shape(update.order, options)
        }
    }
}

fn check_option_diff_shape(question_order: u32, diff: &OptionDiff) -> Result<(), SchemaViolation> {
    if let Some(id) = first_duplicate(diff.updated.iter().map(|option| option.id)) {
        return Err(SchemaViolation::DuplicateOptionUpdate { id });
    }
    let deleted: BTreeSet<OptionId> = diff.deleted.iter().copied().collect();
    if let Some(option) = diff.updated.iter().find(|option| deleted.contains(&option.id)) {
        return Err(SchemaViolation::OptionUpdatedAndDeleted { id: option.id });
    }
    let labels = diff
        .new
        .iter()
        .map(|option| (option.order, option.label.as_str()))
        .chain(diff.updated.iter().map(|option| (option.order, option.label.as_str())));
    for (order, label) in labels {
        if label.trim().is_empty() {
            return Err(SchemaViolation::EmptyOptionLabel {
                question_order,
                order,
            });
        }
    }
    let orders = diff
        .new
        .iter()
        .map(|option| option.order)
        .chain(diff.updated.iter().map(|option| option.order));
    if let Some(order) = first_duplicate(orders) {
        return Err(SchemaViolation::DuplicateOptionOrder {
            question_order,
            order,
        });
    }
    let labels = diff
        .new
        .iter()
        .map(|option| option.label.as_str())
        .chain(diff.updated.iter().map(|option| option.label.as_str()));
    match duplicate_label(question_order, labels) {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Validated, ready-to-apply edit. Applying it in one transaction keeps every
/// form invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditPlan {
    pub header: FormHeader,
    pub insert_questions: Vec<QuestionDefinition>,
    pub update_questions: Vec<StagedQuestionUpdate>,
    pub delete_questions: Vec<QuestionId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedQuestionUpdate {
    pub id: QuestionId,
    pub order: u32,
    pub prompt: String,
    pub question_type: QuestionType,
    pub range: Option<(i32, i32)>,
    pub insert_options: Vec<OptionDefinition>,
    pub update_options: Vec<OptionUpdate>,
    pub delete_options: Vec<OptionId>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSummary {
    pub questions_inserted: usize,
    pub questions_updated: usize,
    pub questions_deleted: usize,
    pub options_inserted: usize,
    pub options_updated: usize,
    pub options_deleted: usize,
}

impl EditPlan {
    pub fn summary(&self) -> EditSummary {
        let mut summary = EditSummary {
            questions_inserted: self.insert_questions.len(),
            questions_updated: self.update_questions.len(),
            questions_deleted: self.delete_questions.len(),
            ..EditSummary::default()
        };
        summary.options_inserted = self
            .insert_questions
            .iter()
            .map(|question| question.body.options().len())
            .sum();
        for update in &self.update_questions {
            summary.options_inserted += update.insert_options.len();
            summary.options_updated += update.update_options.len();
            summary.options_deleted += update.delete_options.len();
        }
        summary
    }
}

impl CheckedDiff {
    /// Resolves every update/delete target against `persisted`, then checks the
    /// merged view of the form that the edit would produce.
    pub fn stage(self, persisted: &PersistedSchema) -> Result<EditPlan, ReconcileError> {
        let diff = self.diff;
        resolve_targets(&diff, persisted)?;

        let mut update_questions = Vec::with_capacity(diff.updated_questions.len());
        for update in diff.updated_questions {
            let Some(current) = persisted.questions.get(&update.id) else {
                return Err(missing(EntityKind::Question, update.id.get()).into());
            };
            update_questions.push(stage_update(update, current)?);
        }

        let delete_questions: Vec<QuestionId> = diff
            .deleted_questions
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        check_final_orders(persisted, &update_questions, &delete_questions, &diff.new_questions)?;

        Ok(EditPlan {
            header: diff.header,
            insert_questions: diff.new_questions,
            update_questions,
            delete_questions,
        })
    }
}

fn missing(entity: EntityKind, id: i64) -> ReferentialError {
    ReferentialError { entity, id }
}

fn resolve_targets(diff: &FormDiff, persisted: &PersistedSchema) -> Result<(), ReferentialError> {
    for update in &diff.updated_questions {
        let Some(current) = persisted.questions.get(&update.id) else {
            return Err(missing(EntityKind::Question, update.id.get()));
        };
        if let Some(options) = update.body.option_diff() {
            let targets = options
                .updated
                .iter()
                .map(|option| option.id)
                .chain(options.deleted.iter().copied());
            for id in targets {
                if !current.options.contains_key(&id) {
                    return Err(missing(EntityKind::Option, id.get()));
                }
            }
        }
    }
    for id in &diff.deleted_questions {
        if !persisted.questions.contains_key(id) {
            return Err(missing(EntityKind::Question, id.get()));
        }
    }
    Ok(())
}

fn stage_update(
    update: QuestionUpdate,
    current: &PersistedQuestion,
) -> Result<StagedQuestionUpdate, SchemaViolation> {
    let question_type = update.body.question_type();
    let mut staged = StagedQuestionUpdate {
        id: update.id,
        order: update.order,
        prompt: update.prompt,
        question_type,
        range: None,
        insert_options: Vec::new(),
        update_options: Vec::new(),
        delete_options: Vec::new(),
    };

    match update.body {
        QuestionUpdateBody::Text => {
            staged.delete_options = current.options.keys().copied().collect();
        }
        QuestionUpdateBody::Range { from, to } => {
            staged.range = Some(check_range(update.order, from, to)?);
            staged.delete_options = current.options.keys().copied().collect();
        }
        QuestionUpdateBody::Radio { options } | QuestionUpdateBody::Checkbox { options } => {
            let deleted: BTreeSet<OptionId> = options.deleted.iter().copied().collect();
            let touched: BTreeSet<OptionId> = options.updated.iter().map(|o| o.id).collect();

            let kept: Vec<&PersistedOption> = current
                .options
                .iter()
                .filter(|(id, _)| !deleted.contains(*id) && !touched.contains(*id))
                .map(|(_, option)| option)
                .collect();
            let merged: Vec<(u32, &str)> = kept
                .iter()
                .map(|option| (option.order, option.label.as_str()))
                .chain(
                    options
                        .updated
                        .iter()
                        .map(|option| (option.order, option.label.as_str())),
                )
                .chain(
                    options
                        .new
                        .iter()
                        .map(|option| (option.order, option.label.as_str())),
                )
                .collect();

            if merged.is_empty() {
                return Err(SchemaViolation::NoOptionsLeft { id: update.id });
            }
            if let Some(order) = first_duplicate(merged.iter().map(|(order, _)| *order)) {
                return Err(SchemaViolation::DuplicateOptionOrder {
                    question_order: update.order,
                    order,
                });
            }
            if let Some(violation) =
                duplicate_label(update.order, merged.iter().map(|(_, label)| *label))
            {
                return Err(violation);
            }

            staged.insert_options = options.new;
            staged.update_options = options.updated;
            staged.delete_options = deleted.into_iter().collect();
        }
    }

    Ok(staged)
}

fn check_final_orders(
    persisted: &PersistedSchema,
    updates: &[StagedQuestionUpdate],
    deletes: &[QuestionId],
    inserts: &[QuestionDefinition],
) -> Result<(), SchemaViolation> {
    let updated: BTreeSet<QuestionId> = updates.iter().map(|update| update.id).collect();
    let removed: BTreeSet<QuestionId> = deletes.iter().copied().collect();

    let untouched = persisted
        .questions
        .iter()
        .filter(|(id, _)| !updated.contains(*id) && !removed.contains(*id))
        .map(|(_, question)| question.order);
    let orders = untouched
        .chain(updates.iter().map(|update| update.order))
        .chain(inserts.iter().map(|question| question.order));

    match first_duplicate(orders) {
        Some(order) => Err(SchemaViolation::QuestionOrderCollision { order }),
        None => Ok(()),
    }
}
