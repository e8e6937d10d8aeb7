use super::*;

#[test]
fn finish_removes_directory_by_default() {
    let ws = FrameWorkspace::create(false).unwrap();
    let dir = ws.path().to_path_buf();
    std::fs::write(ws.frame_path(FrameIndex(0)), b"png").unwrap();
    assert!(dir.join("frame_000000.png").is_file());

    assert_eq!(ws.finish().unwrap(), None);
    assert!(!dir.exists());
}

#[test]
fn finish_keeps_directory_on_request() {
    let ws = FrameWorkspace::create(true).unwrap();
    std::fs::write(ws.frame_path(FrameIndex(7)), b"png").unwrap();

    let kept = ws.finish().unwrap().expect("kept path");
    assert!(kept.join("frame_000007.png").is_file());
    std::fs::remove_dir_all(kept).unwrap();
}

#[test]
fn workspaces_do_not_collide() {
    let a = FrameWorkspace::create(false).unwrap();
    let b = FrameWorkspace::create(false).unwrap();
    assert_ne!(a.path(), b.path());
    a.finish().unwrap();
    b.finish().unwrap();
}
