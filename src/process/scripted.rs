use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use super::{CommandLine, ExitOutcome, ProcessError, ProcessRunner, Result};

/// In-memory runner that records every command and replays scripted output.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    commands: RefCell<Vec<String>>,
    stopped: RefCell<Vec<String>>,
    pauses: RefCell<Vec<Duration>>,
    replies: RefCell<Vec<(String, VecDeque<String>)>>,
    failing: RefCell<Vec<String>>,
    unready_probes: Cell<usize>,
    stop_code: Cell<i32>,
}

#[derive(Debug)]
pub(crate) struct ScriptedHandle {
    command: String,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues `output` for commands containing `pattern`. The last queued reply repeats.
    pub(crate) fn reply(self, pattern: &str, output: &str) -> Self {
        {
            let mut replies = self.replies.borrow_mut();
            match replies.iter_mut().find(|(key, _)| key == pattern) {
                Some((_, queue)) => queue.push_back(output.to_string()),
                None => replies.push((pattern.to_string(), VecDeque::from([output.to_string()]))),
            }
        }
        self
    }

    pub(crate) fn trajectory_states(self, states: &[i32]) -> Self {
        states.iter().fold(self, |runner, state| {
            runner.reply("get_trajectory_states", &state_reply(*state))
        })
    }

    /// Makes every command containing `pattern` exit with status 1.
    pub(crate) fn failing_on(self, pattern: &str) -> Self {
        self.failing.borrow_mut().push(pattern.to_string());
        self
    }

    pub(crate) fn unready_probes(self, count: usize) -> Self {
        self.unready_probes.set(count);
        self
    }

    pub(crate) fn stop_code(self, code: i32) -> Self {
        self.stop_code.set(code);
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub(crate) fn commands_containing(&self, pattern: &str) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter(|command| command.contains(pattern))
            .cloned()
            .collect()
    }

    pub(crate) fn stopped(&self) -> Vec<String> {
        self.stopped.borrow().clone()
    }

    pub(crate) fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }

    fn record(&self, command: &CommandLine) -> Result<String> {
        let rendered = command.render();
        self.commands.borrow_mut().push(rendered.clone());
        if self
            .failing
            .borrow()
            .iter()
            .any(|pattern| rendered.contains(pattern.as_str()))
        {
            return Err(ProcessError::Failed {
                command: rendered,
                outcome: ExitOutcome::from_code(1),
            });
        }
        Ok(rendered)
    }
}

pub(crate) fn state_reply(state: i32) -> String {
    format!(
        "status: \n  code: 0\n  message: ''\ntrajectory_states: \n  header: \n    seq: 0\n    frame_id: ''\n  trajectory_id: [0]\n  trajectory_state: [{state}]\n"
    )
}

impl ProcessRunner for ScriptedRunner {
    type Handle = ScriptedHandle;

    fn run(&self, command: &CommandLine) -> Result<()> {
        self.record(command).map(|_| ())
    }

    fn output(&self, command: &CommandLine) -> Result<String> {
        let rendered = self.record(command)?;
        let mut replies = self.replies.borrow_mut();
        let reply = replies
            .iter_mut()
            .find(|(pattern, _)| rendered.contains(pattern.as_str()))
            .map(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front().unwrap_or_default()
                } else {
                    queue.front().cloned().unwrap_or_default()
                }
            });
        Ok(reply.unwrap_or_default())
    }

    fn probe(&self, command: &CommandLine) -> Result<bool> {
        self.commands.borrow_mut().push(command.render());
        let remaining = self.unready_probes.get();
        if remaining > 0 {
            self.unready_probes.set(remaining - 1);
            return Ok(false);
        }
        Ok(true)
    }

    fn spawn(&self, command: &CommandLine) -> Result<ScriptedHandle> {
        let rendered = self.record(command)?;
        Ok(ScriptedHandle { command: rendered })
    }

    fn stop(&self, handle: ScriptedHandle) -> Result<ExitOutcome> {
        self.stopped.borrow_mut().push(handle.command);
        Ok(ExitOutcome::from_code(self.stop_code.get()))
    }

    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}
