use std::io::{self, IsTerminal, Write};

use tasklist_core::config::Config;
use tasklist_core::controller::{Notification, NotificationKind};
use tasklist_core::view::ListView;
use unicode_width::UnicodeWidthStr;

const EMPTY_MESSAGE: &str = "No tasks found. Add one with `tasklist add <title>`.";

/// `color` accepts the same spellings as every other boolean key and defaults to on.
fn color_enabled(cfg: &Config) -> bool {
    cfg.get_bool("color").unwrap_or(true)
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: color_enabled(cfg) && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, view))]
    pub fn print_task_table(&mut self, view: &ListView) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.render_task_table(&mut out, view)
    }

    pub fn render_task_table<W: Write>(&self, mut out: W, view: &ListView) -> anyhow::Result<()> {
        if view.is_empty {
            writeln!(out, "{EMPTY_MESSAGE}")?;
            writeln!(out, "{} ({})", view.count_label, view.filter.label())?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "Status".to_string(),
            "Created".to_string(),
            "Title".to_string(),
            "Description".to_string(),
        ];

        let mut rows = Vec::with_capacity(view.rows.len());
        for row in &view.rows {
            let status = if row.completed {
                self.paint(row.status.label, "32")
            } else {
                self.paint(row.status.label, "33")
            };
            let title = if row.completed {
                self.paint(&row.title, "9")
            } else {
                row.title.clone()
            };

            rows.push(vec![
                self.paint(&row.id.to_string(), "33"),
                status,
                row.created.clone(),
                title,
                row.description.clone().unwrap_or_default(),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        writeln!(out)?;
        writeln!(out, "{} ({})", view.count_label, view.filter.label())?;
        Ok(())
    }

    /// Success messages go to stderr; warnings and errors are left to the caller's error path.
    pub fn print_notifications(&mut self, notifications: &[Notification]) -> anyhow::Result<()> {
        let mut err = io::stderr().lock();
        for notification in notifications {
            if notification.kind == NotificationKind::Success {
                let title = self.paint(notification.title, "32");
                writeln!(err, "{title}: {}", notification.message)?;
            }
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:width$}"))
        .collect();
    writeln!(writer, "{}", header_line.join(" ").trim_end())?;

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(writer, "{}", rule.join(" "))?;

    for row in rows {
        let mut line = String::new();
        for (idx, cell) in row.iter().enumerate() {
            if idx > 0 {
                line.push(' ');
            }
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[idx].saturating_sub(visible_width)));
        }
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use tasklist_core::view::project;
    use tasklist_core::{Filter, Task, TaskStore};

    use tasklist_core::config::Config;

    use super::{Renderer, color_enabled, strip_ansi};

    fn task(id: u64, title: &str, description: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed,
            created_at: None,
            updated_at: None,
        }
    }

    fn render(store: &TaskStore) -> String {
        let mut buf = Vec::new();
        Renderer::plain()
            .render_task_table(&mut buf, &project(store))
            .expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn table_has_header_rows_and_count() {
        let mut store = TaskStore::new();
        store.set_all(vec![
            task(2, "Écrire", "", true),
            task(10, "Buy milk", "semi", false),
        ]);

        let text = render(&store);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID Status    Created Title    Description");
        assert_eq!(lines[1], "-- --------- ------- -------- -----------");
        assert_eq!(lines[2], "2  Completed         Écrire");
        assert_eq!(lines[3], "10 Pending           Buy milk semi");
        assert_eq!(lines[5], "2 tasks (All)");
    }

    #[test]
    fn empty_view_prints_hint() {
        let mut store = TaskStore::new();
        store.set_all(vec![task(1, "a", "", false)]);
        store.set_filter(Filter::Completed);

        let text = render(&store);
        assert!(text.starts_with("No tasks found."));
        assert!(text.contains("0 tasks (Completed)"));
    }

    #[test]
    fn ansi_sequences_are_invisible_to_width() {
        assert_eq!(strip_ansi("\x1b[33m42\x1b[0m"), "42");
    }

    #[test]
    fn color_setting_uses_config_bool_spellings() {
        assert!(color_enabled(&Config::defaults()));
        let cases = [
            ("y", true),
            ("On ", true),
            ("1", true),
            ("off", false),
            ("nope", false),
        ];
        for (value, expected) in cases {
            let mut cfg = Config::defaults();
            cfg.apply_overrides([("color".to_string(), value.to_string())]);
            assert_eq!(color_enabled(&cfg), expected, "color={value:?}");
        }
    }
}
