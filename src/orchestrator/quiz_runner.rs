//! 限时答题运行器 - 编排层
//!
//! ## 职责
//!
//! 1. **打开会话**：已答复检 → 套题加载(委托 QuizSessionLoader)
//! 2. **交互循环**：命令输入与计时事件双路监听
//! 3. **到期强制提交**：Expired 只出现一次，提交前先取消倒计时
//! 4. **结果展示**：提交成功后输出判分结果

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::SessionError;
use crate::infrastructure::ApiTransport;
use crate::models::{AttemptResult, Question};
use crate::services::{richtext, AttemptService};
use crate::utils::logging::truncate_text;
use crate::workflow::{
    Countdown, NavigateTo, QuizSession, QuizSessionLoader, TickOutcome, TimerEvent,
};

/// 进入限时答题模式
pub async fn run(transport: &ApiTransport, config: &Config) -> Result<()> {
    if config.package_id.is_empty() {
        bail!("答题模式需要配置 PACKAGE_ID");
    }

    let loader = QuizSessionLoader::new();
    let mut session = match loader.open(transport, &config.package_id).await {
        Ok(session) => session,
        Err(e) => {
            // 已有答题记录: 不开新会话，直接展示当时的成绩
            if let Some(SessionError::AlreadyAttempted { attempt_id, .. }) =
                e.downcast_ref::<SessionError>()
            {
                warn!("⚠️ 该套题已作答过，展示已有成绩");
                let result = AttemptService::new().get(transport, attempt_id).await?;
                print_result(&result);
                return Ok(());
            }
            return Err(e);
        }
    };

    // 1 秒一个 Tick 的倒计时，不限时的套题不启动
    let (tick_tx, mut tick_rx) = mpsc::channel::<TimerEvent>(16);
    let mut countdown = session.has_timer().then(|| Countdown::start(tick_tx));

    print_banner(&session);
    print_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // 有未答题时提交要过一道 y/n 确认
    let mut awaiting_confirm = false;

    loop {
        tokio::select! {
            maybe_tick = tick_rx.recv(), if countdown.is_some() => {
                if maybe_tick.is_none() {
                    continue;
                }
                match session.tick() {
                    TickOutcome::Expired => {
                        warn!("⏰ 时间到，自动提交");
                        // 先停表再提交，取消后这一路监听随之关闭
                        if let Some(countdown) = countdown.take() {
                            countdown.cancel();
                        }
                        awaiting_confirm = false;
                        if let Some(result) = submit(transport, &mut session).await? {
                            print_result(&result);
                            return Ok(());
                        }
                        // 提交失败会开闸，留在会话里用 s 手动重试
                    }
                    TickOutcome::Counting(remaining) if remaining % 60 == 0 || remaining <= 10 => {
                        info!("⏱️ 剩余 {}", format_remaining(remaining));
                    }
                    _ => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    warn!("输入结束，退出答题(未提交)");
                    return Ok(());
                };
                let input = line.trim().to_lowercase();

                if awaiting_confirm {
                    awaiting_confirm = false;
                    if input == "y" {
                        if let Some(result) = submit(transport, &mut session).await? {
                            if let Some(countdown) = countdown.take() {
                                countdown.cancel();
                            }
                            print_result(&result);
                            return Ok(());
                        }
                    } else {
                        info!("已取消提交，继续作答");
                        print_question(&session);
                    }
                    continue;
                }

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
                    "s" => {
                        let summary = session.summary();
                        if summary.unanswered > 0 {
                            println!(
                                "还有 {} 道未作答(共 {} 道)，确认提交？(y/n)",
                                summary.unanswered, summary.total
                            );
                            awaiting_confirm = true;
                        } else if let Some(result) = submit(transport, &mut session).await? {
                            if let Some(countdown) = countdown.take() {
                                countdown.cancel();
                            }
                            print_result(&result);
                            return Ok(());
                        }
                    }
                    "q" => {
                        warn!("退出答题(未提交)");
                        return Ok(());
                    }
                    "h" | "?" => print_help(),
                    other => handle_selection(&mut session, other),
                }
            }
        }
    }
}

/// 数字选选项、g 编号跳题，其余给出提示
fn handle_selection(session: &mut QuizSession, input: &str) {
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
            if session.select_answer(&question_id, &answer_id) {
                print_question(session);
            } else {
                warn!("当前不可作答");
            }
        }
        _ => {
            println!("未知命令: {}", input);
            print_help();
        }
    }
}

/// 提交会话；成功返回判分结果，失败开闸重试返回 None
async fn submit(
    transport: &ApiTransport,
    session: &mut QuizSession,
) -> Result<Option<AttemptResult>> {
    let submission = match session.begin_submit() {
        Ok(submission) => submission,
        Err(SessionError::SubmitInProgress) => {
            warn!("⚠️ 提交正在进行中");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let summary = session.summary();
    info!("📤 提交中: 已答 {}/{} 道", summary.answered, summary.total);

    match AttemptService::new().submit(transport, &submission).await {
        Ok(result) => {
            session.complete();
            Ok(Some(result))
        }
        Err(e) => {
            error!("❌ 提交失败: {}", e);
            session.submit_failed();
            info!("作答已保留，输入 s 重试提交");
            Ok(None)
        }
    }
}

// ========== 终端展示辅助函数 ==========

fn print_banner(session: &QuizSession) {
    println!("\n{}", "=".repeat(60));
    println!("📝 {} ({} 道题)", session.package_title(), session.len());
    match session.time_remaining() {
        Some(secs) => println!("⏱️ 限时 {}", format_remaining(secs)),
        None => println!("⏱️ 不限时"),
    }
    println!("{}", "=".repeat(60));
    print_help();
}

fn print_help() {
    println!("命令: 数字=选择选项  n=下一题  p=上一题  g 题号=跳题  s=提交  q=退出  h=帮助");
}

fn print_question(session: &QuizSession) {
    let question = session.current_question();
    let selected = session.selected_answer(&question.id).map(str::to_string);

    println!("\n{}", "─".repeat(40));
    println!(
        "第 {}/{} 题  {}",
        session.current_index() + 1,
        session.len(),
        truncate_text(&richtext::normalize(&question.text).plain_text, 200)
    );
    print_image_links(question);
    for (i, answer) in question.answers.iter().enumerate() {
        let marker = if selected.as_deref() == Some(answer.id.as_str()) {
            "●"
        } else {
            "○"
        };
        println!(
            "  {} {}. {}",
            marker,
            i + 1,
            truncate_text(&richtext::normalize(&answer.text).plain_text, 120)
        );
    }
}

/// 终端显示不了图片，配图和题干里嵌的图都列成链接
fn print_image_links(question: &Question) {
    if let Some(url) = &question.image_url {
        println!("  🖼️ 配图: {}", url);
    }
    if let Ok(urls) = richtext::extract_image_urls(&question.text) {
        for url in urls {
            println!("  🖼️ 题干图: {}", url);
        }
    }
}

fn print_result(result: &AttemptResult) {
    println!("\n{}", "=".repeat(60));
    println!("🎯 判分结果");
    println!("得分: {:.1}", result.score);
    println!("答对: {}/{}", result.correct_answers, result.total_questions);
    println!("用时: {} 秒", result.time_spent);
    println!("{}", "=".repeat(60));
}

fn format_remaining(secs: i64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
