use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use lexchat_widget::config::DEFAULT_LOCAL_BASE_URL;
use lexchat_widget::{ChatSession, ChatWidgetController, HttpBackend, Message, Role, WidgetConfig};

const HELP: &str = "commands: /rate <1-5> [comment], /history, /help, /quit";

/// Terminal front end for the widget, talking to a live backend.
///
/// Usage: `lexchat-console [config.json]`. `LEXCHAT_*` variables override the file.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = match WidgetConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let backend = HttpBackend::new(DEFAULT_LOCAL_BASE_URL, &config);
    tracing::info!(chat_url = backend.chat_url(), "starting console session");
    let session = ChatSession::new(ChatWidgetController::new(config), backend);

    let mut printed = print_new_messages(&session, 0);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                eprintln!("failed to read stdin: {error}");
                return ExitCode::FAILURE;
            }
        };

        match line.trim() {
            "/quit" => break,
            "/help" => println!("{HELP}"),
            "/history" => {
                let controller = session.controller().borrow();
                for (index, turn) in controller.history().turns().iter().enumerate() {
                    println!("{index:>3} {turn}");
                }
            }
            command if command.starts_with("/rate") => rate_last_answer(&session, command).await,
            _ => {
                let _ = session.send_message(&line).await;
            }
        }

        printed = print_new_messages(&session, printed);
    }

    ExitCode::SUCCESS
}

async fn rate_last_answer(session: &ChatSession<HttpBackend>, command: &str) {
    let mut parts = command.splitn(3, ' ').skip(1);
    let Some(value) = parts.next().and_then(|raw| raw.trim().parse::<u8>().ok()) else {
        println!("usage: /rate <1-5> [comment]");
        return;
    };
    let comment = parts.next().unwrap_or_default().trim().to_string();

    let target = session
        .controller()
        .borrow()
        .messages()
        .iter()
        .rev()
        .find(|message| message.feedback.is_some())
        .map(|message| message.id);
    let Some(message_id) = target else {
        println!("no answer to rate yet");
        return;
    };

    let prepared = session.update(|controller| {
        controller.click_star(message_id, value)?;
        controller.set_comment(message_id, comment)
    });
    let outcome = match prepared {
        Ok(()) => session.submit_feedback(message_id).await,
        Err(rejection) => Err(rejection),
    };
    if let Err(rejection) = outcome {
        println!("cannot rate: {rejection:?}");
        return;
    }

    let controller = session.controller().borrow();
    let feedback = controller
        .message(message_id)
        .and_then(|message| message.feedback.as_ref());
    match feedback {
        Some(draft) if draft.is_confirmed() => {
            println!("* {}", controller.config().feedback_thanks)
        }
        Some(draft) => {
            if let Some(notice) = draft.state().error_notice() {
                println!("! {notice}");
            }
        }
        None => {}
    }
}

fn print_new_messages(session: &ChatSession<HttpBackend>, printed: usize) -> usize {
    let controller = session.controller().borrow();
    let messages = controller.messages();
    for message in messages.iter().skip(printed) {
        print_message(message, &controller.config().references_heading);
    }
    messages.len()
}

fn print_message(message: &Message, references_heading: &str) {
    let speaker = match message.role {
        Role::User => "you",
        Role::Bot => "bot",
    };
    println!("{speaker}> {}", message.text);

    if !message.citations.is_empty() {
        println!("    {references_heading}");
        for citation in &message.citations {
            println!("    - {citation}");
        }
    }
    if message.feedback.is_some() {
        println!("    (rate this answer with /rate <1-5> [comment])");
    }
}
