use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, BoardColumn, JobId, SubStage,
};

/// An applicant's applications grouped into Kanban lanes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanbanBoard {
    pub lanes: Vec<BoardLane>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardLane {
    pub column: BoardColumn,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub sub_stage: Option<SubStage>,
    pub status_updated: DateTime<Utc>,
}

impl KanbanBoard {
    /// Every column gets a lane, even when empty. Cards are ordered most recently moved first.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ApplicationRecord>,
    {
        let mut lanes: Vec<BoardLane> = BoardColumn::ALL
            .into_iter()
            .map(|column| BoardLane {
                column,
                cards: Vec::new(),
            })
            .collect();

        for record in records {
            let column = record.status.board_column();
            if let Some(lane) = lanes.iter_mut().find(|lane| lane.column == column) {
                lane.cards.push(BoardCard {
                    id: record.id,
                    job_id: record.job_id,
                    status: record.status,
                    sub_stage: record.sub_stage,
                    status_updated: record.status_updated,
                });
            }
        }

        for lane in &mut lanes {
            lane.cards.sort_by(|a, b| {
                b.status_updated
                    .cmp(&a.status_updated)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        Self { lanes }
    }

    pub fn lane(&self, column: BoardColumn) -> Option<&BoardLane> {
        self.lanes.iter().find(|lane| lane.column == column)
    }

    pub fn total_cards(&self) -> usize {
        self.lanes.iter().map(|lane| lane.cards.len()).sum()
    }
}
