//! 倒计时 - 基础设施层
//!
//! 持有唯一的计时任务，只暴露"每秒发一次 tick"的能力，不认识题目和分数

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// 计时任务发出的一次 tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    /// 发出该 tick 的任务编号
    pub epoch: u64,
}

/// 倒计时
///
/// 同一时间最多只有一个任务在运行：`start` 会先中止旧任务。
/// 旧任务在中止前已经送进通道的 tick 用 [`Countdown::accepts`] 过滤
pub struct Countdown {
    tx: mpsc::UnboundedSender<CountdownTick>,
    handle: Option<JoinHandle<()>>,
    epoch: u64,
}

impl Countdown {
    /// 创建倒计时和接收 tick 的通道
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CountdownTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                handle: None,
                epoch: 0,
            },
            rx,
        )
    }

    /// 启动新一轮倒计时，共发出 `seconds` 次 tick 后自行结束
    ///
    /// 返回本轮编号
    pub fn start(&mut self, seconds: u32) -> u64 {
        self.cancel();
        self.epoch += 1;

        let epoch = self.epoch;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            for _ in 0..seconds {
                interval.tick().await;
                if tx.send(CountdownTick { epoch }).is_err() {
                    break;
                }
            }
        }));

        debug!("⏱️ 倒计时 #{} 启动: {} 秒", epoch, seconds);
        epoch
    }

    /// 中止当前任务（没有任务时什么都不做）
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("⏱️ 倒计时 #{} 已取消", self.epoch);
        }
    }

    /// 是否有任务在运行
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// tick 是否来自当前任务
    pub fn accepts(&self, tick: CountdownTick) -> bool {
        self.handle.is_some() && tick.epoch == self.epoch
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_emits_exact_number_of_ticks() {
        let (mut countdown, mut rx) = Countdown::channel();
        let epoch = countdown.start(3);

        for _ in 0..3 {
            let tick = rx.recv().await.unwrap();
            assert_eq!(tick.epoch, epoch);
            assert!(countdown.accepts(tick));
        }

        // 任务结束后不会再有 tick
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!countdown.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_second() {
        let (mut countdown, mut rx) = Countdown::channel();
        countdown.start(10);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_rejects_stale_ticks() {
        let (mut countdown, mut rx) = Countdown::channel();
        let first = countdown.start(10);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let second = countdown.start(10);
        assert_ne!(first, second);

        // 旧任务留在通道里的 tick 不再被接受
        let stale = rx.recv().await.unwrap();
        assert_eq!(stale.epoch, first);
        assert!(!countdown.accepts(stale));

        let fresh = rx.recv().await.unwrap();
        assert_eq!(fresh.epoch, second);
        assert!(countdown.accepts(fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (mut countdown, mut rx) = Countdown::channel();
        countdown.start(10);
        countdown.cancel();
        assert!(!countdown.is_active());

        tokio::time::sleep(Duration::from_secs(3)).await;
        while let Ok(tick) = rx.try_recv() {
            assert!(!countdown.accepts(tick));
        }
    }
}
