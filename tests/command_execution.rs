use eframe_design::command::{Command, History, ReorderDirection};
use eframe_design::document::Document;
use eframe_design::element::{factory, ElementPatch};
use eframe_design::selection::Selection;
use eframe_design::stroke::{Stroke, StrokeMode};
use egui::Pos2;

fn rectangle(id: u64) -> Command {
    Command::AddElement(factory::create_rectangle(id, 300.0, 100.0, 120.0, 80.0, "#4f46e5"))
}

fn stroke(id: u64) -> Command {
    Command::AddStroke(Stroke::new_ref(
        id,
        vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 10.0)],
        "#333".into(),
        2.0,
        StrokeMode::Draw,
    ))
}

// A mix of every command kind, each of which changes the document.
fn edit_script() -> Vec<Command> {
    vec![
        rectangle(1),
        rectangle(2),
        stroke(3),
        Command::UpdateElement {
            index: 0,
            patch: ElementPatch::position(Pos2::new(5.0, 5.0)),
        },
        Command::Reorder {
            index: 0,
            direction: ReorderDirection::Up,
        },
        Command::SetTitle("Poster".to_owned()),
        Command::DeleteElement { index: 1 },
    ]
}

#[test]
fn undoing_everything_restores_the_root() {
    let root = Document::new();
    let mut history = History::new(root.clone()).with_coalescing(false);
    let script = edit_script();
    for command in &script {
        assert!(history.execute(command).unwrap());
    }
    assert_eq!(history.len(), script.len() + 1);

    for _ in &script {
        assert!(history.undo());
    }
    assert_eq!(*history.current(), root);
    assert!(!history.undo());
}

#[test]
fn redo_after_undo_restores_the_exact_snapshot() {
    let mut history = History::new(Document::new());
    for command in &edit_script() {
        history.execute(command).unwrap();
        let before = history.current().clone();
        history.undo();
        history.redo();
        assert_eq!(*history.current(), before);
    }
}

#[test]
fn commit_after_undo_discards_the_future() {
    let mut history = History::new(Document::new());
    history.execute(&rectangle(1)).unwrap(); // B
    history.execute(&rectangle(2)).unwrap(); // C
    assert_eq!(history.index(), 2);

    history.undo();
    assert_eq!(history.index(), 1);
    history.execute(&stroke(3)).unwrap(); // D

    assert_eq!(history.len(), 3);
    assert_eq!(history.index(), 2);
    assert!(!history.redo());
    assert_eq!(history.current().elements().len(), 1);
    assert_eq!(history.current().strokes().len(), 1);
}

#[test]
fn add_undo_then_stroke_scenario() {
    let mut history = History::new(Document::new());

    history.execute(&rectangle(1)).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.index(), 1);
    assert_eq!(history.current().elements().len(), 1);

    history.undo();
    assert_eq!(history.len(), 2);
    assert_eq!(history.index(), 0);
    assert!(history.current().elements().is_empty());

    history.execute(&stroke(2)).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.index(), 1);
    assert!(history.current().elements().is_empty());
    assert_eq!(history.current().strokes().len(), 1);
}

#[test]
fn past_snapshots_are_never_altered() {
    let mut history = History::new(Document::new());
    history.execute(&rectangle(1)).unwrap();
    let committed = history.current().clone();

    history
        .execute(&Command::UpdateElement {
            index: 0,
            patch: ElementPatch::position(Pos2::new(0.0, 0.0)),
        })
        .unwrap();
    assert_eq!(history.entry(1), Some(&committed));
    assert_eq!(history.entry(1).unwrap().elements()[0].position(), Pos2::new(300.0, 100.0));
}

#[test]
fn deleting_clears_selection_and_undo_does_not_restore_it() {
    let mut history = History::new(Document::new());
    history.execute(&rectangle(1)).unwrap();
    let mut selection = Selection::none();
    selection.select(0);

    let delete = Command::DeleteElement { index: 0 };
    let len = history.current().elements().len();
    history.execute(&delete).unwrap();
    selection.follow(&delete, len);
    assert!(selection.is_empty());

    history.undo();
    assert_eq!(history.current().elements().len(), 1);
    assert!(selection.is_empty());
}

#[test]
fn ids_stay_unique_across_commits() {
    let mut history = History::new(Document::new());
    history.execute(&rectangle(1)).unwrap();
    assert!(history.execute(&stroke(1)).is_err());
    assert_eq!(history.len(), 2);
}
