//! HTML templates

use html_escape::{encode_double_quoted_attribute, encode_text};

/// The sign-in page
pub struct LoginPage<'a> {
    pub app_name: &'a str,
    pub github_login_path: &'a str,
}

impl LoginPage<'_> {
    pub fn render(&self) -> String {
        let name = encode_text(self.app_name);
        let href = encode_double_quoted_attribute(self.github_login_path);

        format!(
            r#"<!DOCTYPE html>
<html>
<head><title>Login - {name}</title></head>
<body>
    <h1>{name}</h1>
    <a href="{href}">Login with Github</a>
</body>
</html>
"#
        )
    }
}
