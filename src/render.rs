use indoc::indoc;
use minijinja::value::Value;
use minijinja::{context, Environment};
use std::borrow::Cow;

use crate::error::Result;
use crate::lease::LeaseRecord;

/// Report columns in output order: record field and table heading.
const COLUMNS: [(&str, &str); 5] = [
    ("address", "IP"),
    ("hostname", "Hostname"),
    ("mac_address", "MAC Address"),
    ("starts", "Starts"),
    ("ends", "Ends"),
];

static REPORT_HEADER: &str = indoc! {
    r##"
    <table border="1"><thead><tr>
    {%- for field, title in columns -%}
    <th>{{ title }}</th>
    {%- endfor -%}
    </tr></thead><tbody>"##
};

static REPORT_ROW: &str = indoc! {
    r##"
    <tr>
    {%- for field, title in columns -%}
    <td>{{ lease[field]|cell }}</td>
    {%- endfor -%}
    </tr>"##
};

static REPORT_FOOTER: &str = "</tbody></table>";

static HOST_ENTRY: &str = "{{ lease.address }} {{ lease.hostname }}.{{ domain }} {{ lease.hostname }}";

/// Escapes text for use inside an HTML table cell.
///
/// Unlike the stock HTML escaper this leaves `/` alone, so dates such as
/// `2024/01/01` stay readable.
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(|c| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn cell(value: &str) -> String {
    escape_html(value).into_owned()
}

/// Renders lease records into hosts file lines and HTML report rows.
pub struct Renderer {
    env: Environment<'static>,
    domain: String,
}

impl Renderer {
    pub fn new(domain: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.add_filter("cell", cell);
        env.add_template("report_header", REPORT_HEADER)?;
        env.add_template("report_row", REPORT_ROW)?;
        env.add_template("host_entry", HOST_ENTRY)?;
        Ok(Self {
            env,
            domain: domain.to_string(),
        })
    }

    pub fn report_header(&self) -> Result<String> {
        let template = self.env.get_template("report_header")?;
        Ok(template.render(context! { columns => COLUMNS })?)
    }

    pub fn report_row(&self, lease: &LeaseRecord) -> Result<String> {
        let template = self.env.get_template("report_row")?;
        Ok(template.render(context! {
            columns => COLUMNS,
            lease => Value::from(lease.clone()),
        })?)
    }

    pub fn report_footer(&self) -> &'static str {
        REPORT_FOOTER
    }

    /// The hosts file line for `lease`, newline included, or `None` if the
    /// lease lacks an address or a usable hostname.
    pub fn host_entry(&self, lease: &LeaseRecord) -> Result<Option<String>> {
        if !lease.has_host_entry() {
            return Ok(None);
        }
        let template = self.env.get_template("host_entry")?;
        let mut line = template.render(context! {
            lease => Value::from(lease.clone()),
            domain => self.domain.as_str(),
        })?;
        line.push('\n');
        Ok(Some(line))
    }
}
