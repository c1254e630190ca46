use crate::{
    context::{use_global_context, GlobalProvider},
    lesson::{Lesson, RenderedBlock, INTRO_LESSON},
    user::{TokenError, User, RETRACT_COST, TOKENS_PER_UNIT},
};
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes, A},
    hooks::use_params_map,
    path,
};

const TELEGRAM_WEB_APP_JS: &str = "https://telegram.org/js/telegram-web-app.js";

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <script src=TELEGRAM_WEB_APP_JS></script>
                <AutoReload options=options.clone()/>
                <HydrationScripts options=options/>
                <MetaTags/>
                <meta name="color-scheme" content="dark light"/>
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico"/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root component: app state around the router.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/lesson-mini-app.css"/>
        <Title text="Lessons"/>
        <GlobalProvider>
            <Router>
                <main>
                    <Routes fallback=|| view! { <p>"Page not found."</p> }>
                        <Route path=path!("/") view=HomePage/>
                        <Route
                            path=path!("/courses/:course_id/modules/:module_id/lessons/:lesson_id")
                            view=LessonPage
                        />
                    </Routes>
                </main>
            </Router>
        </GlobalProvider>
    }
}

/// Profile, balance and the token actions.
#[component]
fn HomePage() -> impl IntoView {
    view! {
        <h1>"Lessons"</h1>
        <HomeStatus/>
        <A href="/courses/1/modules/1/lessons/1">"Open lesson"</A>
    }
}

/// Everything on the home page that follows the global state.
#[component]
fn HomeStatus() -> impl IntoView {
    let context = use_global_context();
    let (last_action, set_last_action) = signal(None::<Result<String, TokenError>>);

    let earn = move |_| {
        let outcome = context
            .add_tokens(1)
            .map(|balance| format!("+{TOKENS_PER_UNIT} tokens, balance is now {balance}"));
        set_last_action.set(Some(outcome));
    };
    let spend = move |_| {
        let outcome = context
            .retract_tokens()
            .map(|balance| format!("-{RETRACT_COST} tokens, balance is now {balance}"));
        set_last_action.set(Some(outcome));
    };

    view! {
        <Show
            when=move || !context.is_loading()
            fallback=|| view! { <p class="loading">"Loading..."</p> }
        >
            {move || context.bootstrap_error().map(|err| view! {
                <p class="error">"Could not load your profile: " {err}</p>
            })}
            {move || match context.user() {
                Some(user) => view! { <Profile user=user/> }.into_any(),
                None => view! { <p>"No Telegram user."</p> }.into_any(),
            }}
            <div class="actions">
                <button on:click=earn>"Earn tokens"</button>
                <button on:click=spend>{format!("Spend {RETRACT_COST} tokens")}</button>
            </div>
            {move || last_action.get().map(|outcome| match outcome {
                Ok(msg) => view! { <p class="ok">{msg}</p> }.into_any(),
                Err(err) => view! { <p class="error">{err.to_string()}</p> }.into_any(),
            })}
        </Show>
    }
}

#[component]
fn Profile(user: User) -> impl IntoView {
    let name = user.display_name();
    let avatar = (!user.photo_url.is_empty()).then(|| {
        view! { <img class="avatar" src=user.photo_url.clone() alt=name.clone()/> }
    });

    view! {
        <div class="profile">
            {avatar}
            <h2>{name.clone()}</h2>
            <p class="balance">{format!("{} tokens", user.tokens_balance)}</p>
        </div>
    }
}

/// The lesson viewer. Route parameters are read but every lesson route
/// shows the same lesson for now.
#[component]
fn LessonPage() -> impl IntoView {
    let _params = use_params_map();

    view! { <LessonView lesson=INTRO_LESSON.clone()/> }
}

#[component]
pub fn LessonView(lesson: Lesson) -> impl IntoView {
    let blocks = lesson.rendered_blocks();

    view! {
        <article class="lesson">
            <header class="lesson-header">
                <img class="lesson-cover" src=lesson.image_url alt=lesson.title.clone()/>
                <div class="lesson-intro">
                    <h1>{lesson.title}</h1>
                    <p>{lesson.description}</p>
                    <button class="quiz">"Go to Quiz"</button>
                </div>
            </header>
            {blocks
                .into_iter()
                .map(|block| view! { <ContentBlockView block=block/> })
                .collect_view()}
        </article>
    }
}

#[component]
fn ContentBlockView(block: RenderedBlock) -> impl IntoView {
    match block {
        RenderedBlock::Paragraph(text) => view! { <p data-block="text">{text}</p> }.into_any(),
        RenderedBlock::Figure { src, alt, caption } => view! {
            <div data-block="image">
                <img src=src alt=alt/>
                {caption.map(|caption| view! { <p>{caption}</p> })}
            </div>
        }
        .into_any(),
        RenderedBlock::CodeSample { language, source } => {
            let class = match language {
                Some(language) => format!("block whitespace-pre-wrap language-{language}"),
                None => "block whitespace-pre-wrap".to_string(),
            };
            view! {
                <pre data-block="code" class="code-sample">
                    <code class=class>{source}</code>
                </pre>
            }
            .into_any()
        }
        RenderedBlock::Video { src, caption } => view! {
            <div data-block="video">
                <video src=src controls=true></video>
                {caption.map(|caption| view! { <p>{caption}</p> })}
            </div>
        }
        .into_any(),
    }
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;
    use crate::{
        context::{GlobalContext, GlobalState},
        lesson::ContentBlock,
    };

    fn render(lesson: Lesson) -> String {
        let owner = Owner::new();
        owner.with(|| view! { <LessonView lesson=lesson/> }.to_html())
    }

    #[test]
    fn renders_one_element_per_supported_block() {
        let lesson = Lesson {
            content: vec![
                ContentBlock::Text {
                    value: "intro".to_string(),
                },
                ContentBlock::Unsupported,
                ContentBlock::Image {
                    value: "https://example.com/a.png".to_string(),
                    caption: Some("A diagram".to_string()),
                },
                ContentBlock::Code {
                    value: "<p>hi</p>".to_string(),
                    language: Some("html".to_string()),
                },
                ContentBlock::Video {
                    value: "https://example.com/v.mp4".to_string(),
                    caption: None,
                },
            ],
            ..INTRO_LESSON.clone()
        };

        let html = render(lesson);

        assert_eq!(html.matches("data-block=").count(), 4);
        let order: Vec<usize> = ["text", "image", "code", "video"]
            .iter()
            .map(|kind| html.find(&format!("data-block=\"{kind}\"")).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "blocks out of order: {html}");
        assert!(html.contains("A diagram"));
        assert!(html.contains("language-html"));
        assert!(!html.contains("<p>hi</p>"), "code must be escaped");
    }

    #[test]
    fn renders_the_intro_lesson() {
        let html = render(INTRO_LESSON.clone());

        assert!(html.contains("Understanding HTML &amp; CSS"));
        assert!(html.contains("Go to Quiz"));
        assert_eq!(html.matches("data-block=").count(), 5);
    }

    fn render_home(state: GlobalState) -> String {
        let owner = Owner::new();
        owner.with(|| {
            provide_context(GlobalContext::new(state));
            view! { <HomeStatus/> }.to_html()
        })
    }

    #[test]
    fn home_shows_the_profile_and_the_bootstrap_error() {
        let html = render_home(GlobalState {
            user: Some(User {
                tokens_balance: 1200,
                ..User::placeholder()
            }),
            course: None,
            is_loading: false,
            bootstrap_error: Some("balance service returned status 503".to_string()),
        });

        assert!(html.contains("Could not load your profile: "), "{html}");
        assert!(html.contains("balance service returned status 503"));
        assert!(html.contains("Developer User"));
        assert!(html.contains("1200 tokens"));
        assert!(!html.contains("Loading..."));
    }

    #[test]
    fn home_without_a_user_says_so() {
        let html = render_home(GlobalState {
            is_loading: false,
            ..GlobalState::default()
        });

        assert!(html.contains("No Telegram user."), "{html}");
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn home_shows_only_the_loading_indicator_while_loading() {
        let html = render_home(GlobalState::default());

        assert!(html.contains("Loading..."), "{html}");
        assert!(!html.contains("Earn tokens"));
    }
}
