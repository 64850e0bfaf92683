mod hierarchy;
mod review;
mod transitions;

use cardia::backlog::{GoalSource, NewGoal};
use time::OffsetDateTime;

pub fn ts(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(secs).expect("valid timestamp")
}

pub fn new_goal(id: &str, source: GoalSource) -> NewGoal {
    NewGoal {
        id: id.to_string(),
        title: format!("goal-{id}"),
        description: format!("description for {id}"),
        source,
        parent_id: None,
        emotional_valence: 0.0,
    }
}

pub fn child_goal(id: &str, parent: &str, source: GoalSource) -> NewGoal {
    NewGoal {
        parent_id: Some(parent.to_string()),
        ..new_goal(id, source)
    }
}
