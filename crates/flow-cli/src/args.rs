//! Parseo de argumentos de `flow-cli`.
use std::path::PathBuf;
use std::time::Duration;

pub const USAGE: &str = "Uso: flow-cli run --file <workflow.json> [--timeout-ms <N>] [--no-delay] [--commands]\n     flow-cli demo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerKind {
    Delay,
    NoDelay,
    Commands,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub file: PathBuf,
    pub timeout: Option<Duration>,
    pub runner: RunnerKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunArgs),
    Demo,
}

/// `args` sin el nombre del binario. `Err` lleva el mensaje para stderr.
pub fn parse(args: &[String]) -> Result<Command, String> {
    match args.first().map(String::as_str) {
        Some("run") => parse_run(&args[1..]).map(Command::Run),
        Some("demo") => Ok(Command::Demo),
        Some(other) => Err(format!("subcomando desconocido: {other}")),
        None => Err("falta el subcomando".into()),
    }
}

fn parse_run(args: &[String]) -> Result<RunArgs, String> {
    let mut file: Option<PathBuf> = None;
    let mut timeout: Option<Duration> = None;
    let mut runner = RunnerKind::Delay;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                i += 1;
                let v = args.get(i).ok_or("--file requiere un valor")?;
                file = Some(PathBuf::from(v));
            }
            "--timeout-ms" => {
                i += 1;
                let v = args.get(i).ok_or("--timeout-ms requiere un valor")?;
                let ms = v.parse::<u64>()
                          .map_err(|_| format!("--timeout-ms inválido: {v}"))?;
                timeout = Some(Duration::from_millis(ms));
            }
            "--no-delay" => runner = RunnerKind::NoDelay,
            "--commands" => runner = RunnerKind::Commands,
            other => return Err(format!("argumento desconocido: {other}")),
        }
        i += 1;
    }
    let file = file.ok_or("falta --file")?;
    Ok(RunArgs { file, timeout, runner })
}
