use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;

/// Keyboard action during an interactive call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    ToggleMicrophone,
    HangUp,
}

/// Result of reading one input line
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    Command(UserCommand),
    Blank,
    Unknown(&'a str),
}

pub fn parse_command(line: &str) -> ParsedLine<'_> {
    match line.trim() {
        "m" => ParsedLine::Command(UserCommand::ToggleMicrophone),
        "q" => ParsedLine::Command(UserCommand::HangUp),
        "" => ParsedLine::Blank,
        other => ParsedLine::Unknown(other),
    }
}

/// Read commands from `input` on a dedicated OS thread.
///
/// The reader is not a runtime blocking task, so a read that never completes
/// does not hold the runtime open at shutdown. The channel closes when the
/// input ends or fails.
pub fn spawn_command_reader<R>(input: R) -> mpsc::Receiver<UserCommand>
where
    R: BufRead + Send + 'static,
{
    let (commands, receiver) = mpsc::channel(8);

    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            let command = match parse_command(&line) {
                ParsedLine::Command(command) => command,
                ParsedLine::Blank => continue,
                ParsedLine::Unknown(other) => {
                    println!(
                        "Unknown command {:?}: 'm' toggles the microphone, 'q' hangs up",
                        other
                    );
                    continue;
                }
            };

            if commands.blocking_send(command).is_err() {
                break;
            }
        }
    });

    receiver
}
