#![forbid(unsafe_code)]

// Question and option orders are kept unique by the reconciliation pass, not
// by an index: an edit may swap two orders inside one transaction.
pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS forms (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          kind TEXT NOT NULL,
          title TEXT NOT NULL,
          description TEXT,
          start_ms INTEGER NOT NULL,
          end_ms INTEGER NOT NULL,
          admission_year_from INTEGER,
          admission_year_to INTEGER,
          graduate_year_from INTEGER,
          graduate_year_to INTEGER,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK(start_ms < end_ms)
        );

        CREATE TABLE IF NOT EXISTS questions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          form_id INTEGER NOT NULL,
          ord INTEGER NOT NULL,
          prompt TEXT NOT NULL,
          kind TEXT NOT NULL CHECK(kind IN ('TEXT', 'RADIO', 'CHECKBOX', 'RANGE')),
          range_from INTEGER,
          range_to INTEGER,
          FOREIGN KEY(form_id) REFERENCES forms(id) ON DELETE CASCADE,
          CHECK(kind <> 'RANGE' OR (range_from IS NOT NULL AND range_to IS NOT NULL AND range_from <= range_to))
        );

        CREATE TABLE IF NOT EXISTS options (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          question_id INTEGER NOT NULL,
          label TEXT NOT NULL,
          ord INTEGER NOT NULL,
          FOREIGN KEY(question_id) REFERENCES questions(id) ON DELETE CASCADE
        );
"#;
