use crate::package::Package;

pub const INDEX_TITLE: &str = "CTS Packages";
pub const INDEX_OBJECT: &str = "index.html";

/// Static page with one link per package, each pointing at
/// `<base_url><filename>`.
pub fn render(packages: &[Package], base_url: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(INDEX_TITLE)));
    html.push_str("</head>\n<body>\n<pre>\n");
    for package in packages {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            escape(&format!("{}{}", base_url, package.filename)),
            escape(&package.filename)
        ));
    }
    html.push_str("</pre>\n</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
