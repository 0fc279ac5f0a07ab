//! Parses a small text protocol whose commands may carry a binary payload,
//! as bytes trickle in from a socket.
//!
//! Each command is one `\r\n`-terminated line. A `PUT <key> <len>` line is
//! followed by exactly `<len>` raw bytes, which may themselves contain
//! `\r\n`. The [`Framer`] switches between line reads and fixed-size reads
//! with one-shot requests, so the payload is never mistaken for commands.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=trace cargo run -p qbuf --example line_protocol
//! ```

#![allow(clippy::while_let_on_iterator)]

use qbuf::{BufferError, FrameMode, Framer};

enum Command {
    Put { key: String, value: Vec<u8> },
    Get { key: String },
    Quit,
}

/// What a command line announces.
enum Line {
    Command(Command),
    Payload { key: String, len: usize },
}

fn parse_line(line: &[u8]) -> Result<Line, String> {
    let line = String::from_utf8_lossy(line);
    let mut words = line.split_ascii_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("PUT"), Some(key), Some(len)) => {
            let len = len.parse().map_err(|_| format!("bad length in {line:?}"))?;
            Ok(Line::Payload {
                key: key.to_owned(),
                len,
            })
        }
        (Some("GET"), Some(key), None) => Ok(Line::Command(Command::Get {
            key: key.to_owned(),
        })),
        (Some("QUIT"), None, None) => Ok(Line::Command(Command::Quit)),
        _ => Err(format!("unknown command {line:?}")),
    }
}

fn main() -> Result<(), BufferError> {
    env_logger::init();

    // In real life this would come from the network.
    let simulated_stream: [&[u8]; 7] = [
        b"PUT greeting 1",
        b"2\r\nhello\r\n",
        b"worldGET gr",
        b"eeting\r\nPUT empty 0\r",
        b"\nGET empty\r\n",
        b"QUIT\r\n",
        b"ignored after quit\r\n",
    ];

    let mut framer = Framer::new(FrameMode::Delimited);
    // Key of the payload requested from the framer, if any.
    let mut payload_for: Option<String> = None;

    'stream: for chunk in simulated_stream {
        framer.feed(chunk)?;

        while let Some(frame) = framer.next() {
            let frame = frame?;
            let command = if let Some(key) = payload_for.take() {
                Command::Put { key, value: frame }
            } else {
                match parse_line(&frame) {
                    Ok(Line::Command(command)) => command,
                    Ok(Line::Payload { key, len: 0 }) => Command::Put {
                        key,
                        value: Vec::new(),
                    },
                    Ok(Line::Payload { key, len }) => {
                        framer.request(FrameMode::Fixed(len))?;
                        payload_for = Some(key);
                        continue;
                    }
                    Err(message) => {
                        eprintln!("protocol error: {message}");
                        continue;
                    }
                }
            };

            match command {
                Command::Put { key, value } => {
                    println!("PUT {key} = {:?}", String::from_utf8_lossy(&value));
                }
                Command::Get { key } => println!("GET {key}"),
                Command::Quit => {
                    println!("QUIT");
                    framer.close();
                    break 'stream;
                }
            }
        }
    }

    assert!(framer.is_closed());
    Ok(())
}
