//! Server-rendered markup for the two screens.

use leptos::*;

use crate::flows::auth::AuthForm;
use crate::flows::today::TodayPage;
use crate::flows::Route;
use crate::models::journal_entry::Mood;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;padding:1.5rem}\
main{max-width:42rem;margin:0 auto}\
.card{border:1px solid #ccc;border-radius:1rem;padding:1.25rem}\
.muted{opacity:.7;font-size:.875rem}\
.error{color:#dc2626;font-size:.875rem}\
.moods{display:flex;gap:.5rem;border:0;padding:0}\
.moods label{border:1px solid #ccc;border-radius:.75rem;padding:.5rem .75rem;font-size:1.25rem;opacity:.6;cursor:pointer}\
.moods input{position:absolute;opacity:0}\
.moods input:checked+span{opacity:1}\
textarea,input[type=email],input[type=password]{width:100%;box-sizing:border-box;border:1px solid #ccc;border-radius:.75rem;padding:.75rem}\
textarea{min-height:180px}\
button{border:1px solid #ccc;border-radius:.75rem;padding:.75rem 1rem;background:none;cursor:pointer}\
.link{border:0;text-decoration:underline;padding:0}";

/// Inline `onsubmit` handler: a form submits at most once until the next
/// page load, and the clicked button shows its `data-busy-label`. The
/// button itself stays enabled so its `name=value` pair is still sent.
pub const SUBMIT_ONCE: &str = "if(this.dataset.busy)return false;\
this.dataset.busy='1';\
var b=event.submitter;\
if(b&&b.dataset.busyLabel)b.textContent=b.dataset.busyLabel;";

fn render<F, N>(view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    let runtime = create_runtime();
    let html = view().into_view().render_to_string().to_string();
    runtime.dispose();
    format!("<!doctype html>\n{}", html)
}

fn layout(title: &'static str, body: View) -> impl IntoView {
    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title}</title>
                <style inner_html=STYLE></style>
            </head>
            <body>
                <main>{body}</main>
            </body>
        </html>
    }
}

pub fn login_page(form: &AuthForm) -> String {
    let mode = form.mode;
    let email = form.email.clone();
    let password = form.password.clone();
    let error = form.error.clone();

    render(move || {
        let body = view! {
            <div class="card">
                <h1>{mode.heading()}</h1>
                <p class="muted">"Private daily reflection."</p>
                <form method="post" action={Route::Login.path()} onsubmit=SUBMIT_ONCE>
                    <input type="hidden" name="mode" value={mode.as_str()}/>
                    <p>
                        <input name="email" type="email" placeholder="Email" value=email required/>
                    </p>
                    <p>
                        <input
                            name="password"
                            type="password"
                            placeholder="Password"
                            value=password
                            required
                        />
                    </p>
                    {error.map(|message| view! { <p class="error" role="alert">{message}</p> })}
                    <p>
                        <button type="submit" name="intent" value="submit" data-busy-label="Please wait...">
                            {mode.submit_label()}
                        </button>
                    </p>
                    <p>
                        <button class="link muted" type="submit" name="intent" value="toggle" formnovalidate>
                            {mode.toggle_label()}
                        </button>
                    </p>
                </form>
            </div>
        }
        .into_view();
        layout(mode.heading(), body)
    })
}

pub fn today_page(page: &TodayPage) -> String {
    let date = page.date_label();
    let date_text = date.clone();
    let selected = page.draft.mood;
    let content = page.draft.content.clone();
    let status = page.status.clone();

    render(move || {
        let moods = Mood::all()
            .map(|mood| {
                view! {
                    <label title={mood.label()}>
                        <input
                            type="radio"
                            name="mood"
                            value={mood.value().to_string()}
                            checked={mood == selected}
                        />
                        <span>{mood.emoji()}</span>
                    </label>
                }
            })
            .collect_view();

        let body = view! {
            <header style="display:flex;justify-content:space-between">
                <div>
                    <h1>"Today"</h1>
                    <p class="muted">{date_text}</p>
                </div>
                <form method="post" action="/logout">
                    <button class="link muted" type="submit">"Log out"</button>
                </form>
            </header>
            <form class="card" method="post" action={Route::Today.path()} onsubmit=SUBMIT_ONCE>
                <input type="hidden" name="entry_date" value=date/>
                <div class="muted">"Mood"</div>
                <fieldset class="moods">{moods}</fieldset>
                <div class="muted">"Reflection"</div>
                <p>
                    <textarea name="content" placeholder="Write a few sentences…">{content}</textarea>
                </p>
                <p>
                    <button type="submit" data-busy-label="Saving…">"Save reflection"</button>
                    {status.map(|status| view! { " " <span class="muted" role="status">{status}</span> })}
                </p>
            </form>
        }
        .into_view();
        layout("Today", body)
    })
}

/// The mood radio rendered as checked, if any.
#[cfg(test)]
pub fn checked_mood(html: &str) -> Option<u8> {
    html.split('<')
        .filter(|tag| tag.starts_with("input") && tag.contains("name=\"mood\""))
        .find(|tag| tag.contains(" checked"))
        .and_then(|tag| tag.split("value=\"").nth(1))
        .and_then(|rest| rest.split('"').next())
        .and_then(|value| value.parse().ok())
}
