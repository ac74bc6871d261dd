use redb::{Database, ReadableDatabase, ReadableTable};

use crate::db::{decode, tables};
use crate::error::Result;
use crate::models::{
    Feature, GameSummary, GameType, LearnerDashboard, LearnerRecord, LearnerStatistics,
    ProgressRecord, Unlocks,
};
use crate::progress::learner_records;

/// Learner view for one email
///
/// Unknown emails simply have no progress and get an all-zero view.
#[allow(clippy::result_large_err)]
pub fn learner_dashboard(db: &Database, email: &str) -> Result<LearnerDashboard> {
    let read_txn = db.begin_read()?;
    let mut dashboard = LearnerDashboard::default();

    for game in GameType::ALL {
        let table = read_txn.open_table(game.table())?;
        let records = learner_records(&table, email)?;
        let summary = GameSummary::from_records(records.iter().map(|(stage, r)| (*stage, r)));
        dashboard.set_game(game, summary);
    }

    Ok(dashboard)
}

/// Learner view for every registered learner, in registry (email) order
#[allow(clippy::result_large_err)]
pub fn teacher_dashboard(db: &Database) -> Result<Vec<LearnerStatistics>> {
    let read_txn = db.begin_read()?;
    let learners = read_txn.open_table(tables::LEARNERS)?;
    let games = GameType::ALL
        .iter()
        .map(|game| -> Result<_> { Ok((*game, read_txn.open_table(game.table())?)) })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for entry in learners.iter()? {
        let (email, bytes) = entry?;
        let email = email.value();
        let learner: LearnerRecord = decode(bytes.value())?;

        let mut dashboard = LearnerDashboard::default();
        for (game, table) in &games {
            let records = learner_records(table, email)?;
            let summary = GameSummary::from_records(records.iter().map(|(stage, r)| (*stage, r)));
            dashboard.set_game(*game, summary);
        }

        rows.push(LearnerStatistics {
            username: learner.username,
            email: email.to_string(),
            dashboard,
        });
    }

    tracing::debug!("Teacher dashboard built for {} learners", rows.len());
    Ok(rows)
}

/// Whether the stage gating `feature` has been passed
#[allow(clippy::result_large_err)]
pub fn is_unlocked(db: &Database, email: &str, feature: Feature) -> Result<bool> {
    let (game, stage) = feature.requirement();
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(game.table())?;

    let record: Option<ProgressRecord> = table
        .get((email, stage))?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;
    Ok(record.is_some_and(|r| r.passed))
}

/// Unlock state of every gated feature
#[allow(clippy::result_large_err)]
pub fn unlocks(db: &Database, email: &str) -> Result<Unlocks> {
    let mut unlocks = Unlocks::default();
    for feature in Feature::ALL {
        unlocks.set(feature, is_unlocked(db, email, feature)?);
    }
    Ok(unlocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::test_support::{attempt, learner, test_db};
    use crate::progress::updater::{register_learner, submit};

    #[test]
    fn test_unknown_learner_has_empty_dashboard() {
        let (_dir, db) = test_db();
        let dashboard = learner_dashboard(&db, "nobody@example.com").unwrap();
        let empty = GameSummary {
            next_stage: 1,
            ..Default::default()
        };
        assert_eq!(
            dashboard,
            LearnerDashboard {
                quiz: empty,
                guess: empty,
                matching: empty,
                total_score: 0,
                total_time_sum: 0,
            }
        );
    }

    #[test]
    fn test_learner_dashboard_sums_passed_records() {
        let (_dir, db) = test_db();
        let email = "siti@example.com";
        register_learner(&db, &learner(email, "Siti")).unwrap();

        // attempt() records 30 seconds per submission
        submit(&db, email, &attempt("quiz", 1, 8, 10)).unwrap();
        submit(&db, email, &attempt("quiz", 2, 7, 10)).unwrap();
        submit(&db, email, &attempt("quiz", 3, 1, 10)).unwrap();
        submit(&db, email, &attempt("guess", 1, 2, 0)).unwrap();

        let dashboard = learner_dashboard(&db, email).unwrap();
        assert_eq!(dashboard.quiz.max_stage, 2);
        assert_eq!(dashboard.quiz.score_sum, 15);
        assert_eq!(dashboard.quiz.next_stage, 3);
        assert_eq!(dashboard.guess.max_stage, 1);
        assert_eq!(dashboard.matching.max_stage, 0);
        assert_eq!(dashboard.total_score, 17);
        assert_eq!(dashboard.total_time_sum, 90);
    }

    #[test]
    fn test_dashboard_does_not_mix_learners() {
        let (_dir, db) = test_db();
        register_learner(&db, &learner("ani@example.com", "Ani")).unwrap();
        register_learner(&db, &learner("an@example.com", "An")).unwrap();

        submit(&db, "ani@example.com", &attempt("guess", 1, 5, 0)).unwrap();

        assert_eq!(learner_dashboard(&db, "an@example.com").unwrap().total_score, 0);
        assert_eq!(learner_dashboard(&db, "ani@example.com").unwrap().total_score, 5);
    }

    #[test]
    fn test_teacher_dashboard_lists_every_learner() {
        let (_dir, db) = test_db();
        register_learner(&db, &learner("siti@example.com", "Siti")).unwrap();
        register_learner(&db, &learner("budi@example.com", "Budi")).unwrap();
        submit(&db, "siti@example.com", &attempt("matching", 2, 3, 0)).unwrap();

        let rows = teacher_dashboard(&db).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].email, "budi@example.com");
        assert_eq!(rows[0].dashboard.total_score, 0);
        assert_eq!(rows[1].username, "Siti");
        assert_eq!(rows[1].dashboard.matching.max_stage, 2);
        assert_eq!(rows[1].dashboard.total_score, 3);
    }

    #[test]
    fn test_unlock_gating() {
        let (_dir, db) = test_db();
        let email = "siti@example.com";
        register_learner(&db, &learner(email, "Siti")).unwrap();

        assert_eq!(unlocks(&db, email).unwrap(), Unlocks::default());

        // Failing stage 5 does not unlock
        submit(&db, email, &attempt("quiz", 5, 2, 10)).unwrap();
        assert!(!is_unlocked(&db, email, Feature::Guess).unwrap());

        submit(&db, email, &attempt("quiz", 5, 6, 10)).unwrap();
        assert!(is_unlocked(&db, email, Feature::Guess).unwrap());
        assert!(!is_unlocked(&db, email, Feature::Matching).unwrap());

        submit(&db, email, &attempt("guess", 9, 1, 0)).unwrap();
        assert_eq!(
            unlocks(&db, email).unwrap(),
            Unlocks {
                guess: true,
                matching: true
            }
        );
    }
}
