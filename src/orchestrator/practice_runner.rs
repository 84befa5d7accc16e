//! 自由练习运行器 - 编排层
//!
//! ## 职责
//!
//! 1. **打开会话**：课程信息与题目并发加载(委托 PracticeLoader)
//! 2. **交互循环**：不计时、不上送，单选覆盖多选切换
//! 3. **重做支持**：r 命令清空全部作答回到第一题
//! 4. **本地统计**：退出时输出已答题数

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::config::Config;
use crate::infrastructure::ApiTransport;
use crate::services::richtext;
use crate::utils::logging::truncate_text;
use crate::workflow::{NavigateTo, PracticeLoader, PracticeSession};

/// 进入自由练习模式
pub async fn run(transport: &ApiTransport, config: &Config) -> Result<()> {
    if config.course_id.is_empty() {
        bail!("练习模式需要配置 COURSE_ID");
    }

    let loader = PracticeLoader::new();
    let (course, mut session) = loader
        .open(transport, &config.course_id, &config.quiz_name)
        .await?;

    print_banner(&course.title, &session);
    print_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(line) = lines.next_line().await? else {
            warn!("输入结束，退出练习");
            break;
        };
        let input = line.trim().to_lowercase();

        match input.as_str() {
            "" => print_question(&session),
            "n" => {
                session.navigate(NavigateTo::Next);
                print_question(&session);
            }
            "p" => {
                session.navigate(NavigateTo::Previous);
                print_question(&session);
            }
            "r" => {
                session.restart();
                println!("已清空全部作答，回到第一题");
                print_question(&session);
            }
            "s" => print_summary(&session),
            "q" => break,
            "h" | "?" => print_help(),
            other => handle_toggle(&mut session, other),
        }
    }

    print_summary(&session);
    Ok(())
}

/// 数字切换选项、g 编号跳题，其余给出提示
fn handle_toggle(session: &mut PracticeSession, input: &str) {
    if let Some(target) = input.strip_prefix('g') {
        match target.trim().parse::<usize>() {
            Ok(number) if number >= 1 => {
                session.navigate(NavigateTo::Index(number - 1));
                print_question(session);
            }
            _ => println!("用法: g 题号 (如 g 3)"),
        }
        return;
    }

    match input.parse::<usize>() {
        Ok(choice) if choice >= 1 => {
            let question = session.current_question();
            let Some(answer) = question.answers.get(choice - 1) else {
                println!("本题只有 {} 个选项", question.answers.len());
                return;
            };
            let question_id = question.id.clone();
            let answer_id = answer.id.clone();
            session.toggle_answer(&question_id, &answer_id);
            print_question(session);
        }
        _ => {
            println!("未知命令: {}", input);
            print_help();
        }
    }
}

// ========== 终端展示辅助函数 ==========

fn print_banner(course_title: &str, session: &PracticeSession) {
    println!("\n{}", "=".repeat(60));
    println!("📖 练习: {} ({} 道题)", course_title, session.len());
    println!("{}", "=".repeat(60));
    print_help();
}

fn print_help() {
    println!("命令: 数字=选/取消选项  n=下一题  p=上一题  g 题号=跳题  r=重做  s=进度  q=退出");
}

fn print_question(session: &PracticeSession) {
    let question = session.current_question();
    let selected: Vec<String> = session
        .selection(&question.id)
        .map(|s| s.selected_ids().iter().map(|id| id.to_string()).collect())
        .unwrap_or_default();

    println!("\n{}", "─".repeat(40));
    println!(
        "第 {}/{} 题{}  {}",
        session.current_index() + 1,
        session.len(),
        if session.current_is_multi() { " [多选]" } else { "" },
        truncate_text(&richtext::normalize(&question.text).plain_text, 200)
    );
    if let Some(url) = &question.image_url {
        println!("  🖼️ 配图: {}", url);
    }
    if let Ok(urls) = richtext::extract_image_urls(&question.text) {
        for url in urls {
            println!("  🖼️ 题干图: {}", url);
        }
    }
    for (i, answer) in question.answers.iter().enumerate() {
        let marker = if selected.iter().any(|id| id == &answer.id) {
            "■"
        } else {
            "□"
        };
        println!(
            "  {} {}. {}",
            marker,
            i + 1,
            truncate_text(&richtext::normalize(&answer.text).plain_text, 120)
        );
    }
}

fn print_summary(session: &PracticeSession) {
    let summary = session.summary();
    println!("\n进度: 已作答 {}/{} 道", summary.answered, summary.total);
}
