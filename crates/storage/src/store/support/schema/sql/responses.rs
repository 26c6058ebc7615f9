#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS responses (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          form_id INTEGER NOT NULL,
          respondent_id INTEGER NOT NULL,
          submitted_at_ms INTEGER NOT NULL,
          UNIQUE(form_id, respondent_id),
          FOREIGN KEY(form_id) REFERENCES forms(id) ON DELETE CASCADE,
          FOREIGN KEY(respondent_id) REFERENCES respondents(id) ON DELETE RESTRICT
        );

        -- One row per selected value; CHECKBOX answers fan out.
        CREATE TABLE IF NOT EXISTS answers (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          response_id INTEGER NOT NULL,
          question_id INTEGER NOT NULL,
          value TEXT NOT NULL,
          FOREIGN KEY(response_id) REFERENCES responses(id) ON DELETE CASCADE,
          FOREIGN KEY(question_id) REFERENCES questions(id) ON DELETE CASCADE
        );
"#;
