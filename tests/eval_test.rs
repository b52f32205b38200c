use std::rc::Rc;

use minlisp::Interpreter;
use minlisp::error::{Error, EvalError};

/// Evaluate `code` and compare the printed form of the *last* result.
macro_rules! assert_eval {
    ($interp:expr, $code:expr, $expected:expr) => {{
        let results = $interp.run($code).unwrap();
        let last = results.last().expect("no result");
        assert_eq!(format!("{}", last.borrow()), $expected);
    }};
}

/// Evaluate `code` and compare the printed form of every top-level result.
macro_rules! assert_prints {
    ($interp:expr, $code:expr, $expected:expr) => {{
        let results = $interp.run($code).unwrap();
        let printed: Vec<String> = results
            .iter()
            .map(|value| format!("{}", value.borrow()))
            .collect();
        let expected: Vec<String> = $expected.into_iter().map(|s| s.to_string()).collect();
        assert_eq!(printed, expected);
    }};
}

#[test]
fn self_evaluating_forms() {
    let interp = Interpreter::new();
    assert_eval!(interp, "42", "42");
    assert_eval!(interp, "-42", "-42");
    assert_eval!(interp, "t", "t");
    assert_eval!(interp, "()", "()");
}

#[test]
fn addition() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(+ 1 2 3)", "6");
    assert_eval!(interp, "(+)", "0");
    assert_eval!(interp, "(+ (+ 1 2) 4)", "7");
    assert_eval!(interp, "(+ -5 2)", "-3");
}

#[test]
fn addition_rejects_non_integers() {
    let interp = Interpreter::new();
    assert!(matches!(
        interp.run("(+ 1 'a)"),
        Err(Error::Eval(EvalError::Message(_)))
    ));
}

#[test]
fn define_then_setq() {
    let interp = Interpreter::new();
    assert_prints!(
        interp,
        "(define x 10) (setq x (+ x 5)) x",
        ["10", "15", "15"]
    );
}

#[test]
fn setq_requires_an_existing_binding() {
    let interp = Interpreter::new();
    assert_eq!(
        interp.run("(setq nope 1)"),
        Err(Error::Eval(EvalError::UnboundVariable("nope".to_string())))
    );
}

#[test]
fn undefined_symbol() {
    let interp = Interpreter::new();
    assert_eq!(
        interp.run("nope"),
        Err(Error::Eval(EvalError::UndefinedSymbol("nope".to_string())))
    );
}

#[test]
fn defun_and_call() {
    let interp = Interpreter::new();
    assert_prints!(interp, "(defun inc (n) (+ n 1)) (inc 41)", [
        "<function>",
        "42"
    ]);
}

#[test]
fn lambda_applies_directly() {
    let interp = Interpreter::new();
    assert_eval!(interp, "((lambda (x y) (+ x y)) 3 4)", "7");
}

#[test]
fn lambda_body_runs_in_sequence() {
    let interp = Interpreter::new();
    assert_eval!(interp, "((lambda () 1 2 3))", "3");
}

#[test]
fn unless_macro() {
    let interp = Interpreter::new();
    assert_prints!(
        interp,
        "(defmacro unless (c body) (list 'if c () body)) (unless (= 1 2) 99)",
        ["<macro>", "99"]
    );
}

#[test]
fn quoting() {
    let interp = Interpreter::new();
    assert_eval!(interp, "'(1 . 2)", "(1 . 2)");
    assert_eval!(interp, "'(1 2 3)", "(1 2 3)");
    assert_eval!(interp, "(quote x)", "x");
}

#[test]
fn quote_law() {
    // 'x and (quote x) evaluate to the identical object.
    let interp = Interpreter::new();
    let tick = interp.run("'some-symbol").unwrap().pop().unwrap();
    let spelled = interp.run("(quote some-symbol)").unwrap().pop().unwrap();
    assert!(Rc::ptr_eq(&tick, &spelled));
}

#[test]
fn quote_arity() {
    let interp = Interpreter::new();
    assert_eq!(
        interp.run("(quote)"),
        Err(Error::Eval(EvalError::Malformed("quote")))
    );
    assert_eq!(
        interp.run("(quote a b)"),
        Err(Error::Eval(EvalError::Malformed("quote")))
    );
}

#[test]
fn if_falsity_is_exactly_nil() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(if () 'a 'b)", "b");
    assert_eval!(interp, "(if 0 'a 'b)", "a");
    assert_eval!(interp, "(if '(1) 'a 'b)", "a");
    assert_eval!(interp, "(if t 'a 'b)", "a");
}

#[test]
fn if_without_else_yields_nil() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(if (= 1 2) 'a)", "()");
}

#[test]
fn if_else_branch_is_a_progn() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(if () 'a 1 2 3)", "3");
}

#[test]
fn if_arity() {
    let interp = Interpreter::new();
    assert_eq!(
        interp.run("(if t)"),
        Err(Error::Eval(EvalError::Malformed("if")))
    );
}

#[test]
fn list_primitive() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(list 1 2 3)", "(1 2 3)");
    assert_eval!(interp, "(list)", "()");
    assert_eval!(interp, "(list (+ 1 2) 'x)", "(3 x)");
}

#[test]
fn numeric_equality() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(= 2 2)", "t");
    assert_eval!(interp, "(= 2 3)", "()");
    assert_eq!(
        interp.run("(= 1)"),
        Err(Error::Eval(EvalError::Malformed("=")))
    );
    assert!(matches!(
        interp.run("(= 'a 1)"),
        Err(Error::Eval(EvalError::Message(_)))
    ));
}

#[test]
fn closures_capture_their_definition_environment() {
    let interp = Interpreter::new();
    // `n` resolves against the frame captured by the inner lambda, not
    // against the environment at the call site.
    assert_eval!(
        interp,
        "(defun make-adder (n) (lambda (m) (+ m n)))
         (define add2 (make-adder 2))
         (define n 100)
         (add2 40)",
        "42"
    );
}

#[test]
fn setq_is_visible_through_captured_frames() {
    let interp = Interpreter::new();
    assert_eval!(
        interp,
        "(define x 1) (defun get-x () x) (setq x 42) (get-x)",
        "42"
    );
}

#[test]
fn counter_mutates_shared_binding() {
    let interp = Interpreter::new();
    assert_eval!(
        interp,
        "(define n 0) (defun bump () (setq n (+ n 1))) (bump) (bump) n",
        "2"
    );
}

#[test]
fn define_in_a_function_is_local() {
    let interp = Interpreter::new();
    assert_prints!(
        interp,
        "(define x 1) (defun f () (define x 99) x) (f) x",
        ["1", "<function>", "99", "1"]
    );
}

#[test]
fn parameters_shadow_outer_bindings() {
    let interp = Interpreter::new();
    assert_prints!(interp, "(define x 5) (defun f (x) (+ x 1)) (f 10) x", [
        "5",
        "<function>",
        "11",
        "5"
    ]);
}

#[test]
fn function_arity_is_checked() {
    let interp = Interpreter::new();
    assert_eq!(
        interp.run("((lambda (x) x) 1 2)"),
        Err(Error::Eval(EvalError::ArityMismatch))
    );
    assert_eq!(
        interp.run("((lambda (x y) x) 1)"),
        Err(Error::Eval(EvalError::ArityMismatch))
    );
}

#[test]
fn head_must_be_callable() {
    let interp = Interpreter::new();
    assert_eq!(
        interp.run("(1 2)"),
        Err(Error::Eval(EvalError::NotCallable))
    );
    assert_eq!(
        interp.run("('x)"),
        Err(Error::Eval(EvalError::NotCallable))
    );
}

#[test]
fn lambda_shape_is_checked() {
    let interp = Interpreter::new();
    // body must not be empty
    assert_eq!(
        interp.run("(lambda (x))"),
        Err(Error::Eval(EvalError::Malformed("lambda")))
    );
    // parameters must be symbols
    assert!(interp.run("(lambda (1) 1)").is_err());
    // parameter list must be a flat list
    assert!(interp.run("(lambda x x)").is_err());
}

#[test]
fn macros_receive_unevaluated_forms() {
    let interp = Interpreter::new();
    assert_eval!(
        interp,
        "(defmacro q (x) (list 'quote x)) (q (+ 1 2))",
        "(+ 1 2)"
    );
}

#[test]
fn macroexpand_does_not_evaluate_the_expansion() {
    let interp = Interpreter::new();
    assert_eval!(
        interp,
        "(defmacro unless (c body) (list 'if c () body))
         (macroexpand (unless (= 1 1) 99))",
        "(if (= 1 1) () 99)"
    );
}

#[test]
fn macroexpand_leaves_other_forms_alone() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(macroexpand (+ 1 2))", "(+ 1 2)");
    assert_eval!(interp, "(macroexpand 7)", "7");
}

#[test]
fn macro_expansion_evaluates_in_the_caller_environment() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(defmacro getx () 'x) (define x 7) (getx)", "7");
}

#[test]
fn println_returns_nil() {
    let interp = Interpreter::new();
    assert_eval!(interp, "(println 42)", "()");
    assert_eq!(
        interp.run("(println)"),
        Err(Error::Eval(EvalError::Malformed("println")))
    );
}

#[test]
fn dotted_argument_lists_are_rejected() {
    let interp = Interpreter::new();
    assert!(interp.run("(list 1 . 2)").is_err());
}

#[test]
fn recursive_function() {
    let interp = Interpreter::new();
    assert_eval!(
        interp,
        "(defun count-down (n) (if (= n 0) 0 (count-down (+ n -1)))) (count-down 100)",
        "0"
    );
}

#[test]
fn unclosed_program_is_an_error() {
    let interp = Interpreter::new();
    assert!(matches!(interp.run("(+ 1 2"), Err(Error::Parse(_))));
}
