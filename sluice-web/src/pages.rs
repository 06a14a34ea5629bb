//! Server-rendered markup
//!
//! Small hand-built pages: a submission form, the player page wrapping
//! a `<video>` element, and error fragments. Titles come from remote
//! metadata, so everything user-controlled is escaped before it lands
//! in HTML.

/// Escapes text for safe interpolation into HTML content or attributes.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
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
    escaped
}

/// Landing page with the URL submission form, optionally prefilled.
pub fn home(prefill: Option<&str>) -> String {
    let value_attr = match prefill {
        Some(url) => format!(r#" value="{}""#, escape_html(url)),
        None => String::new(),
    };

    format!(
        r#"<html>
<head>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Download Video</title>
    <style>
        body {{ font-family: Arial; padding: 20px; background: #f2f2f2; }}
        h2 {{ color: #333; }}
        input[type=text] {{
            width: 100%;
            padding: 12px;
            margin-top: 8px;
            border: 1px solid #ccc;
            border-radius: 4px;
            box-sizing: border-box;
        }}
        button {{
            margin-top: 12px;
            width: 100%;
            padding: 12px;
            background-color: #4CAF50;
            color: white;
            border: none;
            border-radius: 4px;
            font-size: 16px;
            cursor: pointer;
        }}
        button:hover {{ background-color: #45a049; }}
    </style>
</head>
<body>
    <h2>Download Video 📹</h2>
    <form action="/fetch" method="get">
        <input type="text" name="url" placeholder="Paste video link"{value_attr} required>
        <button type="submit">Download &amp; Play</button>
    </form>
</body>
</html>
"#
    )
}

/// Player page for one registered acquisition.
///
/// The `<video>` source and the download link both point at the
/// delivery route for `token`; the browser drives range requests from
/// there.
pub fn player(token: &str, title: &str, extension: &str, content_type: &str) -> String {
    let title = escape_html(title);
    let extension = escape_html(extension);
    let content_type = escape_html(content_type);

    format!(
        r#"<html>
<head>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Playing Video</title>
    <style>
        body {{ font-family: Arial; padding: 20px; background: #f2f2f2; text-align: center; }}
        h2 {{ color: #333; }}
        video {{ max-width: 90%; height: auto; border: 1px solid #ccc; background-color: black; margin-top: 20px; }}
        .controls {{ margin-top: 20px; }}
        .controls a {{
            display: inline-block;
            padding: 10px 20px;
            margin: 0 5px;
            background-color: #007BFF;
            color: white;
            text-decoration: none;
            border-radius: 5px;
            font-size: 16px;
        }}
        .controls a:hover {{ background-color: #0056b3; }}
    </style>
</head>
<body>
    <h2>Playing: {title}</h2>
    <video controls autoplay>
        <source src="/stream/{token}" type="{content_type}">
        Your browser does not support the video tag.
    </video>
    <div class="controls">
        <a href="/">Download another video</a>
        <a href="/stream/{token}" download="{title}.{extension}">Download Original File</a>
    </div>
</body>
</html>
"#
    )
}

/// Error fragment in the house style, optionally with a retry link
/// that resubmits the same URL.
pub fn error(message: &str, retry_url: Option<&str>) -> String {
    let mut body = format!(
        "<div class='message error'>{}</div>",
        escape_html(message)
    );

    if let Some(url) = retry_url {
        body.push_str(&format!(
            "<div class='controls'><a href=\"/fetch?url={}\">Try again</a> <a href=\"/\">Start over</a></div>",
            urlencoding::encode(url)
        ));
    }

    body
}
