/// Landing page served at `/`.
pub static DOCS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Codeforces Stats API</title>
  <style>
    body { font-family: sans-serif; margin: 2rem auto; max-width: 48rem; }
    code { background: #f0f0f0; padding: 0.1rem 0.3rem; }
    td { padding: 0.2rem 0.8rem 0.2rem 0; }
  </style>
</head>
<body>
  <h1>Codeforces Stats API</h1>
  <p>Reshaped and combined views over the Codeforces public API.</p>
  <table>
    <tr><td><code>GET /{handle}</code></td><td>full aggregated statistics</td></tr>
    <tr><td><code>GET /{handle}/basic</code></td><td>profile only</td></tr>
    <tr><td><code>GET /multi/{handles}</code></td><td>profiles for several handles (<code>;</code> or <code>,</code> separated)</td></tr>
    <tr><td><code>GET /{handle}/rating</code></td><td>rating history</td></tr>
    <tr><td><code>GET /{handle}/solved</code></td><td>solved problem count</td></tr>
    <tr><td><code>GET /{handle}/contests</code></td><td>participated contest ids</td></tr>
    <tr><td><code>GET /users/common-contests/{handles}</code></td><td>contests every listed user participated in</td></tr>
    <tr><td><code>GET /contests/upcoming?gym=bool</code></td><td>upcoming contests</td></tr>
  </table>
</body>
</html>
"#;
