use crate::ast::AST;

/// Folds runs of consecutive `Add` and `Move` nodes into single nodes
/// carrying the combined value, recursing into loop bodies. Runs whose
/// values sum to zero are dropped entirely.
///
/// New nodes are merged into the tail of the output sequence, so two runs
/// that become adjacent when a net-zero run between them is dropped still
/// fold into one node. The result therefore never contains two consecutive
/// foldable nodes of the same kind, which makes the pass idempotent.
///
/// Loops whose body folds to nothing are kept; in particular no attempt is
/// made to recognize `[-]` as "set cell to zero".
pub fn optimize(ast: &[AST]) -> Vec<AST> {
    let mut out = Vec::with_capacity(ast.len());
    for node in ast {
        match *node {
            AST::Add(0) | AST::Move(0) => (),
            AST::Add(value) => match out.last_mut() {
                Some(AST::Add(total)) => {
                    *total += value;
                    if *total == 0 {
                        out.pop();
                    }
                }
                _ => out.push(AST::Add(value)),
            },
            AST::Move(steps) => match out.last_mut() {
                Some(AST::Move(total)) => {
                    *total += steps;
                    if *total == 0 {
                        out.pop();
                    }
                }
                _ => out.push(AST::Move(steps)),
            },
            AST::Loop(ref body) => out.push(AST::Loop(optimize(body))),
            AST::Output => out.push(AST::Output),
            AST::Input => out.push(AST::Input),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AST::*;
    use crate::parser::parse;

    fn opt(code: &[u8]) -> Vec<AST> {
        optimize(&parse(code).unwrap())
    }

    #[test]
    fn folds_adds() {
        assert_eq!(opt(b"+++"), vec![Add(3)]);
        assert_eq!(opt(b"--"), vec![Add(-2)]);
        assert_eq!(opt(b"++-"), vec![Add(1)]);
    }

    #[test]
    fn folds_moves() {
        assert_eq!(opt(b">>>"), vec![Move(3)]);
        assert_eq!(opt(b">><"), vec![Move(1)]);
    }

    #[test]
    fn net_zero_runs_dropped() {
        assert_eq!(opt(b"+++---"), vec![]);
        assert_eq!(opt(b"><"), vec![]);
        assert_eq!(opt(b"+><-"), vec![]);
    }

    #[test]
    fn lone_zero_nodes_dropped() {
        assert_eq!(optimize(&[Add(0), Move(0)]), vec![]);
    }

    #[test]
    fn different_kinds_do_not_fold() {
        assert_eq!(opt(b"+>+"), vec![Add(1), Move(1), Add(1)]);
    }

    #[test]
    fn io_terminates_runs() {
        assert_eq!(opt(b"+.+"), vec![Add(1), Output, Add(1)]);
        assert_eq!(opt(b">,>"), vec![Move(1), Input, Move(1)]);
    }

    #[test]
    fn loop_bodies_folded_recursively() {
        assert_eq!(opt(b"[++[>>]]"), vec![Loop(vec![Add(2), Loop(vec![Move(2)])])]);
    }

    #[test]
    fn empty_loop_kept() {
        assert_eq!(opt(b"[+-]"), vec![Loop(vec![])]);
        assert_eq!(opt(b"[]"), vec![Loop(vec![])]);
    }

    #[test]
    fn loop_terminates_runs() {
        assert_eq!(opt(b"+[-]+"), vec![Add(1), Loop(vec![Add(-1)]), Add(1)]);
    }

    #[test]
    fn idempotent() {
        for code in [
            &b"+++---"[..],
            &b"++[>>++<<-]>."[..],
            &b"+><-"[..],
            &b",[.,]"[..],
            &b"[[[]]]"[..],
        ]
        .iter()
        {
            let once = opt(code);
            assert_eq!(optimize(&once), once, "not idempotent for {:?}", code);
        }
    }
}
