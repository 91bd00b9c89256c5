use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use pentago::Board;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collects the requests of one game and writes them to a numbered file.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    requests: Vec<RequestToPlayer>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            requests: Vec::new(),
        })
    }

    /// Request and response are JSON text. A response that isn't valid JSON
    /// is kept as a plain string so the recording shows what the bot said.
    pub fn store_request(&mut self, player: &str, request: &str, response: &str) {
        let parse = |text: &str| {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(String::from(text)))
        };
        self.requests.push(RequestToPlayer {
            player: String::from(player),
            request: parse(request),
            response: parse(response),
        });
    }

    /// Writes `game_NNNNNN.json` and starts a new recording.
    pub fn write_game_recording(&mut self, final_board: Board, result: &str) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let recording = GameRecording {
            requests: std::mem::take(&mut self.requests),
            final_board,
            result: String::from(result),
        };
        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, &recording)?;
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Serialize, Deserialize)]
pub struct GameRecording {
    pub requests: Vec<RequestToPlayer>,
    pub final_board: Board,
    pub result: String,
}

#[derive(Serialize, Deserialize)]
pub struct RequestToPlayer {
    pub player: String,
    pub request: Value,
    pub response: Value,
}
