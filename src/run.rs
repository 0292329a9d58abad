//! This module drives a machine generation by generation until it accepts, rejects or
//! runs out of budget.
//!
//! Acceptance is only checked on generations produced by a step, never on the initial
//! configuration. A run with no surviving branch is rejected; a run that hits its step
//! budget (or is cancelled) is undetermined, which is reported separately from rejection.

use crate::configuration::{Configuration, ConfigurationSet};
use crate::machine::TuringMachine;
use crate::types::TuringMachineError;
use log::debug;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// A generation contained an accepting configuration.
    Accepted,
    /// Every branch died.
    Rejected,
    /// The step budget was used up while branches were still alive.
    BudgetExceeded,
    /// The cancellation flag was raised.
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        self != RunStatus::Running
    }
}

/// The final result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The machine accepted after `steps` steps; `accepting` holds the accepting branches.
    Accepted {
        steps: usize,
        accepting: ConfigurationSet,
    },
    /// No configuration survived step `steps`.
    Rejected { steps: usize },
    /// The budget ran out; `configurations` is the last live generation.
    BudgetExceeded {
        steps: usize,
        configurations: ConfigurationSet,
    },
    /// The run was cancelled; `configurations` is the last live generation.
    Cancelled {
        steps: usize,
        configurations: ConfigurationSet,
    },
}

impl RunOutcome {
    /// Number of steps performed before the run ended.
    pub fn steps(&self) -> usize {
        match self {
            RunOutcome::Accepted { steps, .. }
            | RunOutcome::Rejected { steps }
            | RunOutcome::BudgetExceeded { steps, .. }
            | RunOutcome::Cancelled { steps, .. } => *steps,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Accepted { .. } => RunStatus::Accepted,
            RunOutcome::Rejected { .. } => RunStatus::Rejected,
            RunOutcome::BudgetExceeded { .. } => RunStatus::BudgetExceeded,
            RunOutcome::Cancelled { .. } => RunStatus::Cancelled,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RunOutcome::Accepted { .. })
    }

    /// True for outcomes that are real machine verdicts (accept or reject).
    pub fn is_halted(&self) -> bool {
        matches!(self, RunOutcome::Accepted { .. } | RunOutcome::Rejected { .. })
    }
}

/// A single run of a machine, consumed as an iterator of generations.
///
/// The first item is the initial generation; each following item is the result of one
/// more step. Iteration ends after the generation that accepts or is empty, or once
/// the budget is used up. Without a budget, a machine that never halts yields forever.
pub struct Run<'a, S, A> {
    machine: &'a TuringMachine<S, A>,
    current: ConfigurationSet,
    steps: usize,
    status: RunStatus,
    max_steps: Option<usize>,
    cancel: Option<Arc<AtomicBool>>,
    started: bool,
}

impl<'a, S, A> Run<'a, S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Starts a run from a single configuration.
    pub fn new(machine: &'a TuringMachine<S, A>, initial: Configuration) -> Self {
        Self::from_set(machine, initial.into())
    }

    /// Starts a run from an arbitrary generation.
    pub fn from_set(machine: &'a TuringMachine<S, A>, configurations: ConfigurationSet) -> Self {
        Self {
            machine,
            current: configurations,
            steps: 0,
            status: RunStatus::Running,
            max_steps: None,
            cancel: None,
            started: false,
        }
    }

    /// Limits the run to `max_steps` steps (`None` means unbounded).
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Stops the run as soon as `flag` is raised. The flag is polled once per step.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The most recent generation.
    pub fn current(&self) -> &ConfigurationSet {
        &self.current
    }

    /// The outcome of the run, once it has ended.
    pub fn outcome(&self) -> Option<RunOutcome> {
        let steps = self.steps;
        match self.status {
            RunStatus::Running => None,
            RunStatus::Accepted => Some(RunOutcome::Accepted {
                steps,
                accepting: self.machine.accepting_configurations(&self.current),
            }),
            RunStatus::Rejected => Some(RunOutcome::Rejected { steps }),
            RunStatus::BudgetExceeded => Some(RunOutcome::BudgetExceeded {
                steps,
                configurations: self.current.clone(),
            }),
            RunStatus::Cancelled => Some(RunOutcome::Cancelled {
                steps,
                configurations: self.current.clone(),
            }),
        }
    }

    /// Drives the run to its end and returns the outcome.
    pub fn finish(mut self) -> RunOutcome {
        loop {
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            self.advance();
        }
    }

    fn budget_spent(&self) -> bool {
        self.max_steps.is_some_and(|max| self.steps >= max)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Moves to the next generation and returns it, or `None` if the run has ended.
    fn advance(&mut self) -> Option<&ConfigurationSet> {
        if !self.started {
            self.started = true;
            if self.budget_spent() {
                self.status = RunStatus::BudgetExceeded;
            }
            return Some(&self.current);
        }

        if self.status.is_terminal() {
            return None;
        }

        if self.cancelled() {
            debug!("run cancelled after {} step(s)", self.steps);
            self.status = RunStatus::Cancelled;
            return None;
        }

        let next = self.machine.step(&self.current);
        self.steps += 1;

        self.status = if next.is_empty() {
            RunStatus::Rejected
        } else if next.iter().any(|c| self.machine.is_accepting(c)) {
            RunStatus::Accepted
        } else if self.budget_spent() {
            RunStatus::BudgetExceeded
        } else {
            RunStatus::Running
        };

        debug!(
            "step {}: {} configuration(s) alive, status {:?}",
            self.steps,
            next.len(),
            self.status
        );

        self.current = next;
        Some(&self.current)
    }
}

impl<S, A> Iterator for Run<'_, S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    type Item = ConfigurationSet;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().cloned()
    }
}

impl<S, A> TuringMachine<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Starts a lazy run over `input`. See [`Run`].
    pub fn run_stepwise(&self, input: &[A]) -> Result<Run<'_, S, A>, TuringMachineError> {
        let initial = self.initial_configuration(input)?;
        Ok(Run::new(self, initial))
    }

    /// Runs the machine on `input` for at most `max_steps` steps.
    pub fn run(
        &self,
        input: &[A],
        max_steps: Option<usize>,
    ) -> Result<RunOutcome, TuringMachineError> {
        let outcome = self
            .run_stepwise(input)?
            .with_max_steps(max_steps)
            .finish();
        debug!(
            "run finished after {} step(s): {:?}",
            outcome.steps(),
            outcome.status()
        );
        Ok(outcome)
    }

    /// Returns true if the machine accepts `input` within `max_steps` steps.
    pub fn accepts(
        &self,
        input: &[A],
        max_steps: Option<usize>,
    ) -> Result<bool, TuringMachineError> {
        Ok(self.run(input, max_steps)?.is_accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction::{self, Left, Right, Stay};

    fn s(label: &str) -> String {
        label.to_string()
    }

    fn word(input: &str) -> Vec<String> {
        input.chars().map(|c| c.to_string()).collect()
    }

    fn machine(
        initial: &str,
        accepting: &[&str],
        rules: &[(&str, &str, &[(&str, &str, Direction)])],
    ) -> TuringMachine {
        let mut machine = TuringMachine::new(s("B"));
        machine.add_initial_state(s(initial));
        for state in accepting {
            machine.add_accepting_state(s(state));
        }
        for (state, read, outcomes) in rules {
            machine.add_transition(
                s(state),
                s(read),
                outcomes.iter().map(|(next, write, dir)| (s(next), s(write), *dir)),
            );
        }
        machine
    }

    fn increment() -> TuringMachine {
        machine(
            "q0",
            &["qF"],
            &[
                ("q0", "1", &[("q0", "1", Right)]),
                ("q0", "B", &[("qF", "1", Stay)]),
            ],
        )
    }

    #[test_log::test]
    fn test_unary_increment_accepts() {
        let machine = increment();

        let outcome = machine.run(&word("111"), Some(10)).unwrap();
        match outcome {
            RunOutcome::Accepted { steps, accepting } => {
                assert_eq!(steps, 4);
                assert_eq!(accepting.len(), 1);
                let last = accepting.iter().next().unwrap();
                assert_eq!(last.head(), 3);
                assert_eq!(last.tape().trimmed(), vec![1, 1, 1, 1]);
                assert_eq!(last.last_read(), Some(0));
            }
            other => panic!("Expected Accepted, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_transition_rejects() {
        let mut machine = machine("q0", &["qF"], &[("q0", "1", &[("q0", "1", Right)])]);
        machine.add_input_symbol(s("x"));

        let outcome = machine.run(&word("1x1"), Some(10)).unwrap();
        assert_eq!(outcome, RunOutcome::Rejected { steps: 2 });
        assert!(outcome.is_halted());
    }

    #[test]
    fn test_nondeterministic_branch_finds_acceptance() {
        // q2 walks left forever; q1 accepts two steps in.
        let machine = machine(
            "q0",
            &["q3"],
            &[
                ("q0", "0", &[("q1", "0", Right), ("q2", "0", Left)]),
                ("q1", "B", &[("q3", "B", Right)]),
                ("q2", "B", &[("q2", "B", Left)]),
            ],
        );

        let outcome = machine.run(&word("0"), Some(100)).unwrap();
        assert_eq!(outcome.steps(), 2);
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_budget_exceeded_is_not_rejection() {
        let machine = machine("q0", &["qF"], &[("q0", "B", &[("q0", "B", Right)])]);

        match machine.run(&[], Some(5)).unwrap() {
            RunOutcome::BudgetExceeded {
                steps,
                configurations,
            } => {
                assert_eq!(steps, 5);
                assert_eq!(configurations.len(), 1);
                assert_eq!(configurations.iter().next().unwrap().head(), 5);
            }
            other => panic!("Expected BudgetExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_budget_performs_no_step() {
        let machine = increment();

        let outcome = machine.run(&word("1"), Some(0)).unwrap();
        assert_eq!(outcome.status(), RunStatus::BudgetExceeded);
        assert_eq!(outcome.steps(), 0);
    }

    #[test]
    fn test_initial_accepting_state_is_not_checked() {
        let accepting_start = machine("q0", &["q0"], &[]);

        assert_eq!(
            accepting_start.run(&word(""), None).unwrap(),
            RunOutcome::Rejected { steps: 1 }
        );
    }

    #[test]
    fn test_stepwise_yields_every_generation() {
        let machine = increment();

        let generations: Vec<ConfigurationSet> =
            machine.run_stepwise(&word("11")).unwrap().collect();

        assert_eq!(generations.len(), 4);
        assert_eq!(generations[0].iter().next().unwrap().head(), 0);
        assert_eq!(generations[2].iter().next().unwrap().head(), 2);
        assert!(generations[3]
            .iter()
            .all(|configuration| machine.is_accepting(configuration)));
    }

    #[test]
    fn test_stepwise_is_infinite_without_budget() {
        let machine = machine("q0", &[], &[("q0", "B", &[("q0", "B", Left)])]);

        let run = machine.run_stepwise(&[]).unwrap();
        assert_eq!(run.take(50).count(), 50);
    }

    #[test]
    fn test_run_status_tracking() {
        let machine = increment();
        let mut run = machine.run_stepwise(&word("1")).unwrap();

        assert_eq!(run.status(), RunStatus::Running);
        assert!(run.outcome().is_none());
        run.next();
        run.next();
        assert_eq!(run.steps(), 1);
        run.next();
        assert_eq!(run.status(), RunStatus::Accepted);
        assert!(run.next().is_none());
        assert!(run.outcome().unwrap().is_accepted());
    }

    #[test]
    fn test_cancelled_run() {
        let machine = machine("q0", &[], &[("q0", "B", &[("q0", "B", Right)])]);
        let flag = Arc::new(AtomicBool::new(false));

        let mut run = machine
            .run_stepwise(&[])
            .unwrap()
            .with_cancel(flag.clone());
        run.next();
        run.next();
        flag.store(true, Ordering::Relaxed);

        match run.finish() {
            RunOutcome::Cancelled {
                steps,
                configurations,
            } => {
                assert_eq!(steps, 1);
                assert_eq!(configurations.len(), 1);
            }
            other => panic!("Expected Cancelled, got {:?}", other),
        }
    }

    #[test]
    fn test_run_from_set() {
        let machine = increment();
        let configurations: ConfigurationSet = [
            machine.initial_configuration(&word("1")).unwrap(),
            machine.initial_configuration(&word("11")).unwrap(),
        ]
        .into_iter()
        .collect();

        let outcome = Run::from_set(&machine, configurations).finish();
        assert_eq!(outcome.steps(), 2);
        match outcome {
            RunOutcome::Accepted { accepting, .. } => assert_eq!(accepting.len(), 1),
            other => panic!("Expected Accepted, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts() {
        let machine = increment();

        assert!(machine.accepts(&word("111"), Some(10)).unwrap());
        assert!(!machine.accepts(&word("111"), Some(2)).unwrap());
        assert!(machine.accepts(&word("9"), None).is_err());
    }
}
