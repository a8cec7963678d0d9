//! The sign-in page.
//!
//! Sign-in is passwordless: the browser asks the upstream auth API to email
//! the user a one-time magic link. The page is purely presentational; the
//! server only fills in the upstream URL and the public anon key, and the
//! request to the auth API happens entirely client-side with no retry or
//! timeout handling.

use axum::extract::State;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::state::SignInState;

const PAGE_STYLE: &str = "\
    main { max-width: 480px; margin: 48px auto; font-family: system-ui, sans-serif; }\
    label { display: block; margin-bottom: 8px; }\
    input { width: 100%; padding: 8px; margin-bottom: 12px; box-sizing: border-box; }\
    button { padding: 8px 12px; }\
    .hint { margin-top: 16px; color: #666; }";

/// The message shown once the magic-link email has been requested.
pub const MAGIC_LINK_SENT_MESSAGE: &str = "A magic link has been sent to your email.";

/// Display the sign-in page.
pub async fn get_sign_in_page(State(state): State<SignInState>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Sign in" }
                style { (PreEscaped(PAGE_STYLE)) }
            }
            body {
                main {
                    h2 { "Sign in" }
                    form id="sign-in-form" {
                        label for="email" { "Email" }
                        input type="email" id="email" name="email" required;
                        button type="submit" id="submit-button" { "Send magic link" }
                    }
                    p id="message" {}
                    p class="hint" {
                        "Sign-in uses a one-time link emailed to you instead of a password."
                    }
                }
                script { (PreEscaped(sign_in_script(&state))) }
            }
        }
    }
}

/// The client-side magic-link request.
///
/// The upstream URL and anon key are JSON-encoded so they arrive in the
/// script as properly quoted string literals.
fn sign_in_script(state: &SignInState) -> String {
    let upstream_url = serde_json::to_string(&state.upstream_url).unwrap_or_default();
    let anon_key = serde_json::to_string(&state.anon_key).unwrap_or_default();

    format!(
        r#"
const upstreamUrl = {upstream_url};
const anonKey = {anon_key};

const form = document.getElementById('sign-in-form');
const button = document.getElementById('submit-button');
const message = document.getElementById('message');

form.addEventListener('submit', async (event) => {{
  event.preventDefault();
  button.disabled = true;
  button.textContent = 'Sending...';
  message.textContent = '';

  try {{
    const response = await fetch(`${{upstreamUrl}}/auth/v1/otp`, {{
      method: 'POST',
      headers: {{ 'Content-Type': 'application/json', apikey: anonKey }},
      body: JSON.stringify({{ email: document.getElementById('email').value }}),
    }});

    if (response.ok) {{
      message.textContent = '{MAGIC_LINK_SENT_MESSAGE}';
    }} else {{
      const body = await response.json().catch(() => ({{}}));
      message.textContent = body.msg || body.error || 'Could not send the magic link.';
    }}
  }} finally {{
    button.disabled = false;
    button.textContent = 'Send magic link';
  }}
}});
"#
    )
}
