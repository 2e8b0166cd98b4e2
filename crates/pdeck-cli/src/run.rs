#![forbid(unsafe_code)]

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use pdeck::{Msg, ProofView, Session as ViewSession, ViewOptions};
use pdeck_runtime::{Program, ViewConfig};
use tracing::info;

use crate::cli::RunArgs;
use crate::demo_engine::{DemoEngine, Session};
use crate::error::{CliError, Result};
use crate::prop::Prop;
use crate::script::{self, ScriptLine};

/// How a `run` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub finished: bool,
    pub acknowledged: bool,
}

/// Parse `NAME:TYPE`.
pub fn parse_hyp(spec: &str) -> Result<(String, Prop)> {
    let Some((name, ty)) = spec.split_once(':') else {
        return Err(CliError::invalid(format!("--hyp `{spec}` is not NAME:TYPE")));
    };
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(CliError::invalid(format!("--hyp `{spec}` has no usable name")));
    }
    Ok((name.to_string(), ty.parse()?))
}

fn build_session(args: &RunArgs) -> Result<Session> {
    let goal: Prop = args.goal.parse()?;
    let mut hyps: Vec<(String, Prop)> = Vec::with_capacity(args.hyps.len());
    for spec in &args.hyps {
        let (name, ty) = parse_hyp(spec)?;
        if hyps.iter().any(|(n, _)| *n == name) {
            return Err(CliError::invalid(format!("hypothesis {name} given twice")));
        }
        hyps.push((name, ty));
    }
    Ok(Session::new(hyps, goal))
}

fn load_script(args: &RunArgs) -> Result<Vec<ScriptLine>> {
    match &args.script {
        None => Ok(Vec::new()),
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            script::parse(&source, path)
        }
    }
}

fn write_frame(out: &mut dyn Write, header: &str, program: &Program<ProofView>) -> Result<()> {
    writeln!(out, "== {header}")?;
    writeln!(out, "{}", program.text())?;
    Ok(())
}

/// Start a demo session, replay the script and print each frame to `out`.
pub fn run_session(args: &RunArgs, out: &mut dyn Write) -> Result<RunSummary> {
    if args.width < 10 || args.height < 3 {
        return Err(CliError::invalid("viewport must be at least 10x3"));
    }
    let session = build_session(args)?;
    let config = match &args.config {
        Some(path) => ViewConfig::from_file(path)?,
        None => ViewConfig::default(),
    };
    let steps = load_script(args)?;

    let engine = DemoEngine::new(session);
    let acknowledged = Rc::new(Cell::new(false));
    let ack = Rc::clone(&acknowledged);
    let options = ViewOptions::new(move || ack.set(true)).config(config);
    let mut program = Program::new(ProofView::mount(engine, options), args.width, args.height);
    write_frame(out, "initial", &program)?;

    let mut ran = 0;
    for (index, line) in steps.iter().enumerate() {
        let events = script::events_for(program.model(), program.frame(), index + 1, &line.step)?;
        for event in events {
            program.dispatch(event);
        }
        program.sync();
        ran += 1;
        write_frame(out, &format!("{}: {}", line.line, line.text), &program)?;
        if acknowledged.get() {
            info!(step = line.line, "session acknowledged, stopping script");
            break;
        }
    }

    let finished = matches!(program.model().session(), ViewSession::Finished);
    program.send(Msg::Unmount);
    Ok(RunSummary {
        steps: ran,
        finished,
        acknowledged: acknowledged.get(),
    })
}
