//! 过滤遍历集成测试
//!
//! 定位、分类、状态缓存和可见性切换串起来之后的整体行为

use feedfilter::parsers::html::text_len;
use feedfilter::pipeline::KeywordSet;
use feedfilter::runtime::{apply_command, Command, Response};
use feedfilter::EngineState;

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{body_of_len, controller, element_by_id, hidden_ids, FeedBuilder};

fn keywords(list: &[&str]) -> KeywordSet {
    KeywordSet::new(list.iter().map(|k| k.to_string()).collect())
}

/// 命中关键词的帖子保持可见，其余隐藏
#[test]
fn test_matching_post_stays_visible() {
    // 帖子文本 = 作者 + 正文 + 按钮文字，正文补齐到整体 200 / 300 个字符
    let dom = FeedBuilder::new()
        .post(
            "hiring",
            &body_of_len("Excited to announce we're hiring a backend engineer", 183),
        )
        .post(
            "vacation",
            &body_of_len("Check out my vacation photos from Italy", 283),
        )
        .build();
    assert_eq!(text_len(&element_by_id(&dom, "hiring")), 200);
    assert_eq!(text_len(&element_by_id(&dom, "vacation")), 300);

    let mut controller = controller(&dom);
    let mut state = EngineState::default();

    assert_eq!(controller.run_pass(&mut state), 1);
    assert_eq!(hidden_ids(&dom), vec!["vacation"]);
}

/// 连续两次遍历结果相同，且第二次不再修改页面
#[test]
fn test_pass_is_idempotent() {
    let dom = FeedBuilder::new()
        .post("a", &body_of_len("Now hiring interns", 190))
        .post("b", &body_of_len("Lunch today", 200))
        .post("c", &body_of_len("Sunset walk", 210))
        .build();
    let mut controller = controller(&dom);
    let mut state = EngineState::default();

    controller.run_pass(&mut state);
    let first = hidden_ids(&dom);
    controller.run_pass(&mut state);

    assert_eq!(hidden_ids(&dom), first);
    assert_eq!(first, vec!["b", "c"]);
    assert_eq!(controller.last_pass().mutated, 0);
    assert_eq!(controller.last_pass().reused, 3);
}

/// 关闭再打开后隐藏集合与关闭前一致
#[test]
fn test_toggle_round_trip_restores_hidden_set() {
    let dom = FeedBuilder::new()
        .post("a", &body_of_len("Join our team", 190))
        .post("b", &body_of_len("Weekend hike", 200))
        .build();
    let mut controller = controller(&dom);
    let mut state = EngineState::default();

    controller.run_pass(&mut state);
    let before = hidden_ids(&dom);

    apply_command(Command::Toggle { enabled: false }, &mut controller, &mut state);
    assert!(hidden_ids(&dom).is_empty());
    assert_eq!(state.hidden_count, 0);

    apply_command(Command::Toggle { enabled: true }, &mut controller, &mut state);
    assert_eq!(hidden_ids(&dom), before);
    // 启用状态变化后全部重新分类
    assert_eq!(controller.last_pass().reclassified, 2);
}

/// 五个隐藏的帖子在关闭过滤后全部恢复显示
#[test]
fn test_disable_with_five_hidden_posts() {
    let mut feed = FeedBuilder::new();
    for i in 0..5 {
        feed = feed.post(&format!("p{}", i), &body_of_len("Random thoughts", 200 + i));
    }
    let dom = feed.build();
    let mut controller = controller(&dom);
    let mut state = EngineState::default();

    assert_eq!(controller.run_pass(&mut state), 5);
    assert_eq!(
        apply_command(Command::Toggle { enabled: false }, &mut controller, &mut state),
        Response::ok()
    );

    assert_eq!(state.hidden_count, 0);
    assert!(hidden_ids(&dom).is_empty());
    assert_eq!(
        apply_command(Command::GetStatus, &mut controller, &mut state),
        Response::Status {
            enabled: false,
            count: 0
        }
    );
}

/// 替换关键词后按新关键词重新分类
#[test]
fn test_keyword_replacement_reclassifies() {
    let dom = FeedBuilder::new()
        .post("job", &body_of_len("We're hiring", 200))
        .post("cat", &body_of_len("My cat did a thing", 200))
        .build();
    let mut controller = controller(&dom);
    let mut state = EngineState::default();

    controller.run_pass(&mut state);
    assert_eq!(hidden_ids(&dom), vec!["cat"]);

    apply_command(
        Command::UpdateKeywords {
            keywords: vec!["CAT".to_string()],
        },
        &mut controller,
        &mut state,
    );
    assert_eq!(hidden_ids(&dom), vec!["job"]);
    assert_eq!(state.hidden_count, 1);
}

/// 空关键词集合什么也不命中，所有帖子隐藏
#[test]
fn test_empty_keyword_set_hides_all() {
    let dom = FeedBuilder::new()
        .post("a", &body_of_len("We're hiring", 200))
        .post("b", &body_of_len("Anything else", 200))
        .build();
    let mut controller = controller(&dom);
    let mut state = EngineState::new(true, keywords(&[]));

    assert_eq!(controller.run_pass(&mut state), 2);
}

/// 新流入的帖子在下一次遍历中被分类，已有帖子复用缓存
#[test]
fn test_new_posts_are_classified_incrementally() {
    use feedfilter::parsers::html::{append_child, parse_fragment};

    let dom = FeedBuilder::new()
        .post("a", &body_of_len("Hiring now", 200))
        .post("b", &body_of_len("Coffee", 200))
        .build();
    let mut controller = controller(&dom);
    let mut state = EngineState::new(true, keywords(&["hiring"]));
    controller.run_pass(&mut state);

    let feed = element_by_id(&dom, "feed");
    let incoming = common::PostFixture::new("c", &body_of_len("Tea", 200)).to_html();
    for node in parse_fragment(&incoming).unwrap() {
        append_child(&feed, node);
    }

    assert_eq!(controller.run_pass(&mut state), 2);
    assert_eq!(hidden_ids(&dom), vec!["b", "c"]);
    assert_eq!(controller.last_pass().reused, 2);
    assert_eq!(controller.last_pass().reclassified, 1);
}
