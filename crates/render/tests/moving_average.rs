use render::moving_average;

#[test]
fn averages_full_windows_only() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(moving_average(&values, 2), vec![1.5, 2.5, 3.5, 4.5]);
    assert_eq!(moving_average(&values, 5), vec![3.0]);
}

#[test]
fn shorter_history_than_window_is_empty() {
    assert!(moving_average(&[1.0, 2.0], 3).is_empty());
    assert!(moving_average(&[], 1).is_empty());
}

#[test]
fn window_of_one_is_identity() {
    let values = [3.0, 9.0, 27.0];
    assert_eq!(moving_average(&values, 1), values.to_vec());
    assert_eq!(moving_average(&values, 0), values.to_vec());
}
