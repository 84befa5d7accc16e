//! 倒计时任务 - 流程层
//!
//! 只负责按秒产生 Tick 事件，剩余秒数归答题会话管理。
//! 任务是显式可取消的: cancel() 或句柄析构都会中止任务，
//! 不存在提交之后还在后台滴答的定时器。

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// 计时事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// 一秒过去了
    Tick,
}

/// 倒计时任务句柄
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// 启动倒计时，每秒向通道发送一次 Tick
    ///
    /// 接收端关闭时任务自行退出
    pub fn start(tx: mpsc::Sender<TimerEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            // 错过的 tick 顺延，不补发
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval 的第一个 tick 立即完成，跳过
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(TimerEvent::Tick).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// 中止倒计时
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
