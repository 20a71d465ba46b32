use std::io::{BufRead, Write};

use tracing::warn;

use crate::error::DiningError;
use crate::simulation::RunReport;
use crate::strategy::StrategyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run(StrategyKind),
    Exit,
}

// 0 で終了、1..=4 で戦略を選ぶ。それ以外は InvalidOption
pub fn parse_choice(line: &str) -> Result<Choice, DiningError> {
    let line = line.trim();
    let code: u8 = line
        .parse()
        .map_err(|_| DiningError::InvalidOption(line.to_string()))?;
    if code == 0 {
        return Ok(Choice::Exit);
    }
    StrategyKind::from_code(code)
        .map(Choice::Run)
        .ok_or_else(|| DiningError::InvalidOption(line.to_string()))
}

fn prompt<W: Write>(out: &mut W) -> Result<(), DiningError> {
    writeln!(out)?;
    writeln!(out, "=== Dining Philosophers: choose a solution ===")?;
    for kind in StrategyKind::ALL {
        writeln!(out, "{}) {}", kind.code(), kind.label())?;
    }
    writeln!(out, "0) Exit")?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// 入力が 0 か EOF になるまでメニューを繰り返す
///
/// 不正な入力は報告してもう一度聞くだけで、哲学者は起動しない。
/// `run` が返したエラーはそのまま返して終了する。
pub fn run_menu<R, W, F>(mut input: R, mut out: W, mut run: F) -> Result<(), DiningError>
where
    R: BufRead,
    W: Write,
    F: FnMut(StrategyKind) -> Result<RunReport, DiningError>,
{
    let mut line = String::new();
    loop {
        prompt(&mut out)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_choice(&line) {
            Ok(Choice::Exit) => return Ok(()),
            Ok(Choice::Run(kind)) => {
                writeln!(out, "[{}] running...", kind.label())?;
                let report = run(kind)?;
                writeln!(out, "{report}")?;
            }
            Err(e) => {
                warn!(input = line.trim(), "rejected selector input");
                writeln!(out, "{e}")?;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    fn fake_report(kind: StrategyKind) -> RunReport {
        RunReport {
            kind,
            philosophers: Vec::new(),
            elapsed: Duration::ZERO,
            peak_diners: 0,
        }
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("0\n").unwrap(), Choice::Exit);
        assert_eq!(
            parse_choice(" 3 ").unwrap(),
            Choice::Run(StrategyKind::OrderedLock)
        );
        assert!(matches!(parse_choice("9"), Err(DiningError::InvalidOption(s)) if s == "9"));
        assert!(matches!(parse_choice("-1"), Err(DiningError::InvalidOption(_))));
        assert!(matches!(parse_choice("abc"), Err(DiningError::InvalidOption(_))));
    }

    #[test]
    fn test_invalid_option_loops_without_running() {
        let mut out = Vec::new();
        let mut runs = Vec::new();
        run_menu(Cursor::new("9\n0\n"), &mut out, |kind| {
            runs.push(kind);
            Ok(fake_report(kind))
        })
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(runs.is_empty());
        assert!(out.contains("invalid option: 9"));
        // 2 回プロンプトが出ている
        assert_eq!(out.matches("0) Exit").count(), 2);
    }

    #[test]
    fn test_runs_selected_until_eof() {
        let mut out = Vec::new();
        let mut runs = Vec::new();
        run_menu(Cursor::new("1\n4\n"), &mut out, |kind| {
            runs.push(kind);
            Ok(fake_report(kind))
        })
        .unwrap();

        assert_eq!(runs, vec![StrategyKind::Monitor, StrategyKind::Arbiter]);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("=== RESULTS: Waiter / arbiter ==="));
    }

    #[test]
    fn test_run_error_stops_menu() {
        let mut out = Vec::new();
        let result = run_menu(Cursor::new("2\n1\n"), &mut out, |_| {
            Err(DiningError::PhilosopherPanicked(3))
        });
        assert!(matches!(result, Err(DiningError::PhilosopherPanicked(3))));
    }
}
