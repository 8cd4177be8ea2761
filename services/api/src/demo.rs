use crate::infra::InMemoryAutomationGateway;
use clap::Args;
use std::sync::Arc;

use jobdeck::board::{
    BoardService, BoardSnapshot, DragRequest, FieldSubmissionResolution, MoveResolution,
};
use jobdeck::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct BoardSnapshotArgs {
    /// Filter the board by company name or job title
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Sort alphabetically by company instead of most-recent-first
    #[arg(long)]
    pub(crate) alpha: bool,
    /// Drag the first applied card into the interview column and show the
    /// settled board
    #[arg(long)]
    pub(crate) simulate_drag: bool,
    /// Fill the missing fields of the first card waiting on input
    #[arg(long)]
    pub(crate) complete_input: bool,
}

pub(crate) async fn run_board_snapshot(args: BoardSnapshotArgs) -> Result<(), AppError> {
    let BoardSnapshotArgs {
        search,
        alpha,
        simulate_drag,
        complete_input,
    } = args;

    let gateway = Arc::new(InMemoryAutomationGateway::seeded());
    let service = BoardService::new(gateway);
    service.load().await?;

    if let Some(query) = search {
        service.set_search(query);
    }
    if alpha {
        service.toggle_sort();
    }

    println!("Jobdeck board demo");
    render_board(&service.snapshot());

    if simulate_drag {
        run_drag_demo(&service).await;
    }
    if complete_input {
        run_input_demo(&service).await;
    }

    Ok(())
}

async fn run_drag_demo(service: &BoardService<InMemoryAutomationGateway>) {
    let snapshot = service.snapshot();
    let Some(card) = snapshot
        .columns
        .iter()
        .find(|column| column.id == "applied")
        .and_then(|column| column.applications.first())
    else {
        println!("\nDrag demo: the applied column is empty, nothing to move");
        return;
    };

    println!(
        "\nDrag demo: moving {} | {} from applied to interview",
        card.company_name, card.title
    );

    let resolution = service
        .move_via_drag(DragRequest {
            application_id: card.id,
            source_column: "applied".to_string(),
            target_column: "interview".to_string(),
            source_index: 0,
            target_index: 0,
        })
        .await;

    match resolution {
        MoveResolution::Committed(status) => {
            println!("Backend confirmed the move, new status {status}");
        }
        MoveResolution::Reordered => println!("Same-column reorder, nothing persisted"),
        MoveResolution::Reverted(error) => println!("Move failed and was reverted: {error}"),
        MoveResolution::Rejected(rejection) => println!("Move rejected locally: {rejection}"),
    }

    render_board(&service.snapshot());
}

async fn run_input_demo(service: &BoardService<InMemoryAutomationGateway>) {
    let snapshot = service.snapshot();
    let Some(card) = snapshot
        .columns
        .iter()
        .find(|column| column.id == "needs_input")
        .and_then(|column| column.applications.first())
        .cloned()
    else {
        println!("\nInput demo: no application is waiting on input");
        return;
    };

    println!(
        "\nInput demo: providing {} missing field(s) for {} | {}",
        card.missing_fields.len(),
        card.company_name,
        card.title
    );

    let values = card
        .missing_fields
        .iter()
        .map(|field| (field.key.clone(), format!("demo value for {}", field.key)))
        .collect();

    match service.provide_missing_fields(card.id, values).await {
        FieldSubmissionResolution::Submitted => {
            println!("Fields accepted, automation resumed");
        }
        FieldSubmissionResolution::Failed(error) => println!("Submission failed: {error}"),
        FieldSubmissionResolution::Skipped(rejection) => {
            println!("Submission skipped: {rejection:?}")
        }
    }

    render_board(&service.snapshot());
}

fn render_board(snapshot: &BoardSnapshot) {
    if !snapshot.search_query.is_empty() {
        println!("Search: '{}'", snapshot.search_query);
    }

    for column in &snapshot.columns {
        println!("\n{} ({})", column.title, column.applications.len());
        for card in &column.applications {
            println!(
                "- {} | {} | {} | since {}",
                card.company_name,
                card.title,
                card.status_label,
                card.created_at.format("%Y-%m-%d")
            );
            if !card.missing_fields.is_empty() {
                let keys: Vec<&str> = card
                    .missing_fields
                    .iter()
                    .map(|field| field.key.as_str())
                    .collect();
                println!("  waiting on: {}", keys.join(", "));
            }
        }
    }
}
