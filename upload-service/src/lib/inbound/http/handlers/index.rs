use axum::response::Html;

/// Bare HTML page for trying register, login and upload from a browser.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
    <h2>Authentication &amp; File Upload Test</h2>

    <h3>1. Register</h3>
    <form id="registerForm">
        <input type="text" id="regUsername" placeholder="Username" required><br><br>
        <input type="password" id="regPassword" placeholder="Password" required><br><br>
        <button type="submit">Register</button>
    </form>
    <div id="registerResult"></div>

    <h3>2. Login</h3>
    <form id="loginForm">
        <input type="text" id="loginUsername" placeholder="Username" required><br><br>
        <input type="password" id="loginPassword" placeholder="Password" required><br><br>
        <button type="submit">Login</button>
    </form>
    <div id="loginResult"></div>

    <h3>3. File Upload</h3>
    <form action="/api/v1/upload" method="post" enctype="multipart/form-data">
        <input type="file" name="data" accept="image/*" required><br><br>
        <input type="text" name="token" id="tokenField" placeholder="Token (from register or login)" required><br><br>
        <input type="submit" value="Upload Image">
    </form>

    <script>
        async function submitCredentials(path, usernameId, passwordId, resultId) {
            const username = document.getElementById(usernameId).value;
            const password = document.getElementById(passwordId).value;
            const target = document.getElementById(resultId);
            try {
                const response = await fetch(path, {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ username, password })
                });
                const result = await response.json();
                target.textContent = JSON.stringify(result, null, 2);
                if (result.token) {
                    document.getElementById('tokenField').value = result.token;
                }
            } catch (error) {
                target.textContent = 'Error: ' + error.message;
            }
        }

        document.getElementById('registerForm').addEventListener('submit', (e) => {
            e.preventDefault();
            submitCredentials('/api/v1/register', 'regUsername', 'regPassword', 'registerResult');
        });

        document.getElementById('loginForm').addEventListener('submit', (e) => {
            e.preventDefault();
            submitCredentials('/api/v1/login', 'loginUsername', 'loginPassword', 'loginResult');
        });
    </script>
</body>
</html>
"#;
