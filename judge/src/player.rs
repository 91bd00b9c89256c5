use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use pentago::{Board, Move, Okay, Request, Side};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::recording::Recorder;

/// How to start a bot, as read from a player config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    /// The program followed by its arguments.
    pub cmd: Vec<String>,
}

impl PlayerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: PlayerConfig = serde_json::from_reader(BufReader::new(file))?;
        if config.cmd.is_empty() {
            anyhow::bail!("Player config '{}' has an empty cmd", path.display());
        }
        Ok(config)
    }
}

/// Something that can take part in a game refereed by [`play_game()`](crate::play_game).
pub trait Participant {
    fn name(&self) -> &str;
    fn new_game(&mut self, recorder: &mut Option<Recorder>, side: Side) -> anyhow::Result<()>;
    fn play_turn(
        &mut self,
        recorder: &mut Option<Recorder>,
        side: Side,
        board: Board,
    ) -> anyhow::Result<Move>;
}

/// A bot running as a child process, talking JSON lines over stdin/stdout.
pub struct Player {
    pub name: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    // A re-usable buffer for IO.
    // Should always be empty before and after perform_request().
    buf: String,
}

impl Player {
    pub fn new(name: &str, cmd: &[String]) -> anyhow::Result<Self> {
        let Some((program, args)) = cmd.split_first() else {
            anyhow::bail!("No command given for player {}", name);
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            anyhow::bail!("Could not access the pipes of player {}", name);
        };
        Ok(Self {
            name: String::from(name),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            buf: String::new(),
        })
    }

    pub fn from_config(config: &PlayerConfig) -> anyhow::Result<Self> {
        Self::new(&config.nick, &config.cmd)
    }

    fn send(&mut self, req: &Request) -> anyhow::Result<String> {
        let mut req_json = serde_json::to_string(req)?;
        trace!(name: "Sending request", player = &self.name, request = %req_json);
        req_json.push('\n');
        self.stdin.write_all(req_json.as_bytes())?;
        self.stdin.flush()?;
        req_json.pop();
        Ok(req_json)
    }

    pub fn perform_request<T: serde::de::DeserializeOwned + std::fmt::Debug>(
        &mut self,
        recorder: &mut Option<Recorder>,
        req: &Request,
    ) -> anyhow::Result<T> {
        let req_json = self.send(req)?;
        self.buf.clear();
        if self.stdout.read_line(&mut self.buf)? == 0 {
            anyhow::bail!("Player {} closed its output", self.name);
        }
        let serialized_response = self.buf.trim_end();
        trace!(name: "Received response", player = &self.name, response = %serialized_response);
        if let Some(recorder) = recorder {
            recorder.store_request(&self.name, &req_json, serialized_response);
        }
        let response = serde_json::from_str::<T>(serialized_response)?;
        self.buf.clear();
        Ok(response)
    }
}

impl Participant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self, recorder: &mut Option<Recorder>, side: Side) -> anyhow::Result<()> {
        let _: Okay = self.perform_request(recorder, &Request::NewGame { side })?;
        Ok(())
    }

    fn play_turn(
        &mut self,
        recorder: &mut Option<Recorder>,
        side: Side,
        board: Board,
    ) -> anyhow::Result<Move> {
        self.perform_request(recorder, &Request::PlayTurn { side, board })
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // The bot may already be gone, in which case there's nobody to say bye to
        if self.send(&Request::Bye).is_ok() {
            if let Err(err) = self.child.wait() {
                warn!(player = &self.name, %err, "Could not wait for player to exit");
            }
        } else {
            let _ = self.child.kill();
        }
    }
}
