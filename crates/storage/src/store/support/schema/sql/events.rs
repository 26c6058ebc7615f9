#![forbid(unsafe_code)]

// No foreign key: the trail outlives the form it describes.
pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS form_events (
          seq INTEGER PRIMARY KEY AUTOINCREMENT,
          form_id INTEGER NOT NULL,
          ts_ms INTEGER NOT NULL,
          type TEXT NOT NULL,
          payload_json TEXT NOT NULL
        );
"#;
