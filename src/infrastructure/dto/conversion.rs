//! Conversion from wire action payloads to the closed domain `Action` enum.
//!
//! This is the fail-open boundary: unknown kinds, missing fields, and
//! negative indices all collapse into `Action::Ignored`, and a `SET_WORKOUT`
//! whose payload is not plan-shaped is replaced by the error placeholder so
//! the session stays usable.

use crate::domain::{Action, WorkoutPlan, placeholder_plan};

use super::websocket::ActionPayload;

impl From<ActionPayload> for Action {
    fn from(payload: ActionPayload) -> Self {
        match payload.action.as_str() {
            "TOGGLE_TIMER" => Action::ToggleTimer,
            "ADD_ROUND" => match payload.user {
                Some(user) if !user.is_empty() => Action::AddRound { participant: user },
                _ => Action::Ignored,
            },
            "RESET_TIMER" => Action::ResetTimer,
            "RESET_ROUNDS" => Action::ResetRounds,
            "CONFIGURE_TIMER" => match payload.config {
                Some(config) => Action::ConfigureTimer { config },
                None => Action::Ignored,
            },
            "SET_WORKOUT" => match payload.workout {
                Some(value) => {
                    let workout = WorkoutPlan::from_value(value).unwrap_or_else(|e| {
                        tracing::warn!("SET_WORKOUT payload is not plan-shaped: {}", e);
                        placeholder_plan(&format!("invalid plan: {}", e))
                    });
                    Action::SetWorkout { workout }
                }
                None => Action::Ignored,
            },
            "SET_ACTIVE_PART" => match payload.index {
                Some(index) if index >= 0 => Action::SetActivePart {
                    index: index as usize,
                },
                _ => Action::Ignored,
            },
            _ => Action::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlanPart, TimerMode};
    use serde_json::json;

    fn payload(action: &str) -> ActionPayload {
        ActionPayload {
            action: action.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_actions_convert() {
        // given / when / then:
        assert_eq!(Action::from(payload("TOGGLE_TIMER")), Action::ToggleTimer);
        assert_eq!(Action::from(payload("RESET_TIMER")), Action::ResetTimer);
        assert_eq!(Action::from(payload("RESET_ROUNDS")), Action::ResetRounds);
    }

    #[test]
    fn test_add_round_requires_user() {
        // given:
        let with_user = ActionPayload {
            user: Some("nina".to_string()),
            ..payload("ADD_ROUND")
        };
        let empty_user = ActionPayload {
            user: Some(String::new()),
            ..payload("ADD_ROUND")
        };

        // when / then:
        assert_eq!(
            Action::from(with_user),
            Action::AddRound {
                participant: "nina".to_string()
            }
        );
        assert_eq!(Action::from(empty_user), Action::Ignored);
        assert_eq!(Action::from(payload("ADD_ROUND")), Action::Ignored);
    }

    #[test]
    fn test_configure_timer_requires_config() {
        // given:
        let with_config = ActionPayload {
            config: serde_json::from_value(
                json!({"mode": "EMOM", "rounds": 10, "work": 40, "rest": 20}),
            )
            .ok(),
            ..payload("CONFIGURE_TIMER")
        };

        // when / then:
        match Action::from(with_config) {
            Action::ConfigureTimer { config } => {
                assert_eq!(config.mode, TimerMode::Emom);
                assert_eq!(config.work, 40);
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(Action::from(payload("CONFIGURE_TIMER")), Action::Ignored);
    }

    #[test]
    fn test_set_workout_with_bad_shape_becomes_placeholder() {
        // given:
        let bad = ActionPayload {
            workout: Some(json!("not a plan")),
            ..payload("SET_WORKOUT")
        };

        // when:
        let action = Action::from(bad);

        // then: the session gets a usable error plan, not a crash
        match action {
            Action::SetWorkout { workout } => {
                assert_eq!(workout.focus, "Error");
                assert!(matches!(workout.parts[0], PlanPart::Error(_)));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_set_active_part_rejects_negative_index() {
        // given:
        let negative = ActionPayload {
            index: Some(-1),
            ..payload("SET_ACTIVE_PART")
        };
        let valid = ActionPayload {
            index: Some(2),
            ..payload("SET_ACTIVE_PART")
        };

        // when / then:
        assert_eq!(Action::from(negative), Action::Ignored);
        assert_eq!(Action::from(valid), Action::SetActivePart { index: 2 });
    }

    #[test]
    fn test_unknown_action_kind_is_ignored() {
        // given / when / then:
        assert_eq!(Action::from(payload("SELF_DESTRUCT")), Action::Ignored);
        assert_eq!(Action::from(payload("")), Action::Ignored);
    }
}
