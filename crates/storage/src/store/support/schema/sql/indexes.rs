#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_forms_window ON forms(start_ms, end_ms);
        CREATE INDEX IF NOT EXISTS idx_questions_form ON questions(form_id, ord);
        CREATE INDEX IF NOT EXISTS idx_options_question ON options(question_id, ord);
        CREATE INDEX IF NOT EXISTS idx_responses_respondent ON responses(respondent_id);
        CREATE INDEX IF NOT EXISTS idx_answers_response ON answers(response_id);
        CREATE INDEX IF NOT EXISTS idx_answers_question ON answers(question_id);
        CREATE INDEX IF NOT EXISTS idx_form_events_form ON form_events(form_id, seq);
"#;
