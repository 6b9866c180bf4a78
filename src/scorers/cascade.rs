// =============================================================================
// Rule Cascade Runner
// =============================================================================
//
// Every threshold-driven scorer is an ordered list of named rules evaluated
// top to bottom against (domain context, cascade state). Rule order is part
// of each scorer's contract — a rule's predicate may read what earlier rules
// decided.
//
// Effect semantics:
//   Lock     — highest-priority override (credit CRITICAL, curve inversion).
//              Fixes the action; later rules may only adjust confidence.
//   Set      — primary decision. The first Set wins; later Sets are
//              suppressed once a decision exists.
//   Override — upgrades a standing HOLD into BUY/SELL. Ignored once the
//              action is non-HOLD or locked.
//   Adjust   — signed confidence delta, accumulated and applied at the end.
//
// Final confidence = (base + accumulated adjustments) clamped to the
// scorer's floor/ceiling. The rationale is the primary rule's note followed
// by every adjustment note, " | "-separated.

use crate::types::Action;

/// What a fired rule does to the cascade state.
#[derive(Debug, Clone)]
pub enum Effect {
    Lock { action: Action, confidence: f64 },
    Set { action: Action, confidence: f64 },
    Override { action: Action, confidence: f64 },
    Adjust(f64),
}

/// One named rule: a predicate + effect over the domain context and the
/// running cascade state. Returns `None` when the rule does not fire.
pub struct Rule<C> {
    pub name: &'static str,
    pub eval: fn(&C, &CascadeState) -> Option<(Effect, String)>,
}

/// Mutable state threaded through the cascade.
#[derive(Debug, Clone)]
pub struct CascadeState {
    pub action: Action,
    pub confidence: f64,
    /// A Lock/Set/Override has fixed the action.
    pub decided: bool,
    /// A Lock fired; the action can no longer change.
    pub locked: bool,
    /// Accumulated signed confidence adjustments.
    pub boost: f64,
    primary_note: Option<String>,
    adjust_notes: Vec<String>,
}

impl CascadeState {
    fn new(neutral_confidence: f64) -> Self {
        Self {
            action: Action::Hold,
            confidence: neutral_confidence,
            decided: false,
            locked: false,
            boost: 0.0,
            primary_note: None,
            adjust_notes: Vec::new(),
        }
    }
}

/// Result of running a cascade.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub action: Action,
    pub confidence: f64,
    pub rationale: String,
    /// Names of every rule that fired, in evaluation order.
    pub fired: Vec<&'static str>,
}

/// Run `rules` in order over `ctx`.
///
/// `neutral_confidence`/`neutral_rationale` describe the do-nothing HOLD
/// outcome used when no primary rule fires. `floor`/`ceiling` bound the
/// final confidence.
pub fn run_cascade<C>(
    rules: &[Rule<C>],
    ctx: &C,
    neutral_confidence: f64,
    neutral_rationale: &str,
    floor: f64,
    ceiling: f64,
) -> CascadeOutcome {
    let mut state = CascadeState::new(neutral_confidence);
    let mut fired: Vec<&'static str> = Vec::new();

    for rule in rules {
        let Some((effect, note)) = (rule.eval)(ctx, &state) else {
            continue;
        };

        match effect {
            Effect::Lock { action, confidence } => {
                if !state.locked {
                    state.action = action;
                    state.confidence = confidence;
                    state.decided = true;
                    state.locked = true;
                    state.primary_note = Some(note);
                    fired.push(rule.name);
                }
            }
            Effect::Set { action, confidence } => {
                if !state.locked && !state.decided {
                    state.action = action;
                    state.confidence = confidence;
                    state.decided = true;
                    state.primary_note = Some(note);
                    fired.push(rule.name);
                }
            }
            Effect::Override { action, confidence } => {
                if !state.locked && state.action == Action::Hold {
                    state.action = action;
                    state.confidence = confidence;
                    state.decided = true;
                    state.primary_note = Some(note);
                    fired.push(rule.name);
                }
            }
            Effect::Adjust(delta) => {
                state.boost += delta;
                state.adjust_notes.push(note);
                fired.push(rule.name);
            }
        }
    }

    let mut parts: Vec<String> = Vec::with_capacity(1 + state.adjust_notes.len());
    parts.push(
        state
            .primary_note
            .unwrap_or_else(|| neutral_rationale.to_string()),
    );
    parts.extend(state.adjust_notes);

    CascadeOutcome {
        action: state.action,
        confidence: (state.confidence + state.boost).clamp(floor, ceiling),
        rationale: parts.join(" | "),
        fired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        danger: bool,
        bullish: bool,
        bonus: bool,
    }

    fn rules() -> Vec<Rule<Ctx>> {
        vec![
            Rule {
                name: "danger-lock",
                eval: |ctx, _| {
                    ctx.danger.then(|| {
                        (
                            Effect::Lock {
                                action: Action::Sell,
                                confidence: 0.9,
                            },
                            "danger".to_string(),
                        )
                    })
                },
            },
            Rule {
                name: "bullish-set",
                eval: |ctx, _| {
                    ctx.bullish.then(|| {
                        (
                            Effect::Set {
                                action: Action::Buy,
                                confidence: 0.8,
                            },
                            "bullish".to_string(),
                        )
                    })
                },
            },
            Rule {
                name: "second-set-suppressed",
                eval: |ctx, _| {
                    ctx.bullish.then(|| {
                        (
                            Effect::Set {
                                action: Action::Sell,
                                confidence: 0.7,
                            },
                            "never wins".to_string(),
                        )
                    })
                },
            },
            Rule {
                name: "bonus-adjust",
                eval: |ctx, _| ctx.bonus.then(|| (Effect::Adjust(0.1), "bonus".to_string())),
            },
            Rule {
                name: "hold-upgrade",
                eval: |_, state| {
                    (state.action == Action::Hold).then(|| {
                        (
                            Effect::Override {
                                action: Action::Buy,
                                confidence: 0.6,
                            },
                            "upgraded".to_string(),
                        )
                    })
                },
            },
        ]
    }

    #[test]
    fn neutral_when_nothing_fires() {
        let rules: Vec<Rule<Ctx>> = vec![];
        let ctx = Ctx {
            danger: false,
            bullish: false,
            bonus: false,
        };
        let outcome = run_cascade(&rules, &ctx, 0.6, "neutral stance", 0.4, 0.95);
        assert_eq!(outcome.action, Action::Hold);
        assert!((outcome.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(outcome.rationale, "neutral stance");
        assert!(outcome.fired.is_empty());
    }

    #[test]
    fn first_set_wins() {
        let ctx = Ctx {
            danger: false,
            bullish: true,
            bonus: false,
        };
        let outcome = run_cascade(&rules(), &ctx, 0.6, "neutral", 0.4, 0.95);
        assert_eq!(outcome.action, Action::Buy);
        assert!((outcome.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(outcome.fired, vec!["bullish-set"]);
    }

    #[test]
    fn lock_suppresses_everything_but_adjust() {
        let ctx = Ctx {
            danger: true,
            bullish: true,
            bonus: true,
        };
        let outcome = run_cascade(&rules(), &ctx, 0.6, "neutral", 0.4, 0.95);
        assert_eq!(outcome.action, Action::Sell);
        // Lock confidence 0.9 + adjust 0.1 hits the ceiling.
        assert!((outcome.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(outcome.fired, vec!["danger-lock", "bonus-adjust"]);
        assert!(outcome.rationale.starts_with("danger"));
        assert!(outcome.rationale.contains("bonus"));
    }

    #[test]
    fn override_only_upgrades_hold() {
        // Nothing decides: the hold-upgrade rule converts HOLD to BUY.
        let ctx = Ctx {
            danger: false,
            bullish: false,
            bonus: false,
        };
        let outcome = run_cascade(&rules(), &ctx, 0.6, "neutral", 0.4, 0.95);
        assert_eq!(outcome.action, Action::Buy);
        assert!((outcome.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(outcome.rationale, "upgraded");
    }

    #[test]
    fn adjustments_accumulate_and_floor_applies() {
        let rules: Vec<Rule<Ctx>> = vec![
            Rule {
                name: "penalty-a",
                eval: |_, _| Some((Effect::Adjust(-0.2), "a".to_string())),
            },
            Rule {
                name: "penalty-b",
                eval: |_, _| Some((Effect::Adjust(-0.2), "b".to_string())),
            },
        ];
        let ctx = Ctx {
            danger: false,
            bullish: false,
            bonus: false,
        };
        let outcome = run_cascade(&rules, &ctx, 0.6, "neutral", 0.4, 0.95);
        // 0.6 - 0.4 = 0.2, floored at 0.4.
        assert!((outcome.confidence - 0.4).abs() < f64::EPSILON);
        assert_eq!(outcome.rationale, "neutral | a | b");
    }
}
