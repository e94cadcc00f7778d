//! Admin index page: registered paths plus the log-level widget.

/// One discoverable admin endpoint.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub path: String,
    pub description: String,
}

/// Registry of admin endpoints, rendered as the `/` discovery page.
///
/// Entries are appended once at construction and rendered in registration
/// order; there is no de-duplication and no removal.
#[derive(Debug, Default)]
pub struct AdminIndex {
    entries: Vec<IndexEntry>,
}

const PAGE_HEAD: &str = r#"<html>
<title>Chat Service Debug</title>
<body>
<h2>Chat Service Debug</h2>
<ul>
"#;

const PAGE_TAIL: &str = r#"</ul>
<h2>Log Level</h2>
<form onSubmit="putLogLevel()">
  <select id="log-level-select">
    <option value="DEBUG">DEBUG</option>
    <option value="INFO">INFO</option>
    <option value="WARN">WARN</option>
    <option value="ERROR">ERROR</option>
  </select>
  <input type="submit" value="Change"></input>
</form>
<script>
  window.onload = function() { getLogLevel(); };
  function getLogLevel() {
    const req = new XMLHttpRequest();
    req.open('GET', '/log/level', true);
    req.onload = function() {
      if (req.status >= 200 && req.status < 400) {
        document.getElementById('log-level-select').value = req.responseText;
      } else {
        console.error('Error: could not retrieve log level.');
      }
    };
    req.send();
  }
  function putLogLevel() {
    const req = new XMLHttpRequest();
    req.open('PUT', '/log/level', false);
    req.setRequestHeader('Content-Type', 'application/x-www-form-urlencoded');
    req.onload = function() { window.location.reload(); };
    req.send('level=' + document.getElementById('log-level-select').value);
  }
</script>
</body>
</html>
"#;

impl AdminIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint; order of registration is order of display.
    pub fn add_entry(&mut self, path: impl Into<String>, description: impl Into<String>) {
        self.entries.push(IndexEntry {
            path: path.into(),
            description: description.into(),
        });
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Render the discovery page.
    pub fn render(&self) -> String {
        let mut page = String::from(PAGE_HEAD);
        for entry in &self.entries {
            page.push_str(&format!(
                "  <li><a href=\"{}\">{}</a> {}</li>\n",
                entry.path, entry.path, entry.description
            ));
        }
        page.push_str(PAGE_TAIL);
        page
    }
}
