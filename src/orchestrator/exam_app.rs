//! 终端考试应用 - 编排层
//!
//! ## 职责
//!
//! 1. **事件循环**：用 `tokio::select!` 同时等待用户输入、倒计时 tick 和生成结果
//! 2. **资源管理**：唯一持有 [`Countdown`] 和进行中的生成任务
//! 3. **计时同步**：每次状态变化后按题目序号重启或取消倒计时
//! 4. **界面输出**：调用 `screen` 渲染当前状态
//!
//! 不做判分和状态判断，这些都交给 [`ExamRunner`]

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clients::build_generator;
use crate::config::Config;
use crate::error::{AppError, AppResult, GenerationError};
use crate::infrastructure::{Countdown, CountdownTick};
use crate::models::exam_config::ExamConfig;
use crate::models::question::Question;
use crate::orchestrator::command::{parse_command, Command};
use crate::orchestrator::screen;
use crate::services::QuestionGenerator;
use crate::workflow::{ExamRunner, ExamState, TickOutcome};

type PendingGeneration = JoinHandle<Result<Vec<Question>, GenerationError>>;

/// 处理完一行输入后是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 应用主结构
pub struct App<W: Write> {
    runner: ExamRunner,
    generator: Arc<QuestionGenerator>,
    countdown: Countdown,
    ticks: mpsc::UnboundedReceiver<CountdownTick>,
    /// 倒计时当前对应的题目序号
    timer_serial: Option<u64>,
    pending: Option<PendingGeneration>,
    out: W,
}

impl App<io::Stdout> {
    /// 按配置初始化，输出到 stdout
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let client = build_generator(config)?;
        Ok(Self::new(
            config.initial_exam_config(),
            QuestionGenerator::new(client),
            io::stdout(),
        ))
    }

    /// 从 stdin 读取命令，直到 quit 或输入结束
    pub async fn run(&mut self) -> AppResult<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }
}

impl<W: Write> App<W> {
    pub fn new(exam_config: ExamConfig, generator: QuestionGenerator, out: W) -> Self {
        let (countdown, ticks) = Countdown::channel();
        Self {
            runner: ExamRunner::new(exam_config),
            generator: Arc::new(generator),
            countdown,
            ticks,
            timer_serial: None,
            pending: None,
            out,
        }
    }

    pub fn runner(&self) -> &ExamRunner {
        &self.runner
    }

    /// 事件循环
    pub async fn run_with<R: AsyncBufRead + Unpin>(&mut self, input: R) -> AppResult<()> {
        let mut lines = input.lines();
        self.render()?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("输入结束");
                        break;
                    };
                    if self.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Some(tick) = self.ticks.recv() => {
                    self.handle_tick(tick)?;
                }
                result = wait_pending(&mut self.pending), if self.pending.is_some() => {
                    self.pending = None;
                    self.handle_generated(result)?;
                }
            }
        }

        self.shutdown();
        info!("👋 程序退出");
        Ok(())
    }

    /// 处理一行用户输入
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = parse_command(self.runner.state(), line);
        debug!("命令: {:?}", command);

        let result = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                let help = screen::render_help();
                self.print_line(&help)?;
                Ok(())
            }
            Command::Unknown(hint) => {
                self.print_line(&hint)?;
                Ok(())
            }
            Command::SetTopic(topic) => self.runner.set_topic(topic).map(|_| ()),
            Command::SetDifficulty(difficulty) => self.runner.set_difficulty(difficulty),
            Command::SetCount(input) => self.runner.set_question_count(&input).map(|_| ()),
            Command::Generate => self.start_generation(),
            Command::Select(letter) => {
                if !self.runner.select(letter) {
                    self.print_line(&format!("本题没有选项 {}", letter))?;
                }
                Ok(())
            }
            Command::Next => self.next_question(),
            Command::NewExam => self.runner.new_exam(),
            Command::Retry => self.runner.retry(),
        };

        match result {
            // 校验错误已经保存在表单里，随表单一起显示
            Err(AppError::Validation(_)) => {}
            Err(e) => {
                self.print_line(&e.to_string())?;
                return Ok(Flow::Continue);
            }
            Ok(()) => {}
        }

        self.sync_countdown();
        self.render()?;
        Ok(Flow::Continue)
    }

    /// 处理倒计时 tick
    pub fn handle_tick(&mut self, tick: CountdownTick) -> io::Result<()> {
        if !self.countdown.accepts(tick) || self.runner.state() != ExamState::InProgress {
            debug!("忽略过期的 tick #{}", tick.epoch);
            return Ok(());
        }

        match self.runner.tick() {
            Ok(TickOutcome::Running { time_left }) => {
                let timer = screen::render_timer(time_left);
                queue!(
                    self.out,
                    MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    Print(timer)
                )?;
                self.out.flush()
            }
            Ok(TickOutcome::Expired(_)) => {
                self.print_line("\n⏰ Time's up!")?;
                self.sync_countdown();
                self.render()
            }
            Err(e) => self.print_line(&e.to_string()),
        }
    }

    /// 处理生成结果
    pub fn handle_generated(
        &mut self,
        result: Result<Vec<Question>, GenerationError>,
    ) -> io::Result<()> {
        match self.runner.finish_generation(result) {
            Ok(()) => {}
            // 失败时错误消息已经写进表单
            Err(AppError::Generation(_)) => {}
            Err(e) => debug!("丢弃生成结果: {}", e),
        }
        self.sync_countdown();
        self.render()
    }

    fn start_generation(&mut self) -> AppResult<()> {
        let config = self.runner.begin_generation()?;
        let generator = Arc::clone(&self.generator);
        self.pending = Some(tokio::spawn(async move { generator.generate(&config).await }));
        Ok(())
    }

    fn next_question(&mut self) -> AppResult<()> {
        let has_selection = self
            .runner
            .session()
            .is_some_and(|session| session.selected().is_some());
        if !has_selection {
            return Err(AppError::InvalidTransition("请先选择一个答案"));
        }
        self.runner.advance().map(|_| ())
    }

    /// 保证倒计时与当前题目一致：作答中且换了题就重启，否则取消
    fn sync_countdown(&mut self) {
        match (self.runner.state(), self.runner.session()) {
            (ExamState::InProgress, Some(session)) => {
                let serial = session.question_serial();
                if self.timer_serial != Some(serial) {
                    self.countdown.start(session.time_left());
                    self.timer_serial = Some(serial);
                }
            }
            _ => {
                self.countdown.cancel();
                self.timer_serial = None;
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let text = match (self.runner.state(), self.runner.session()) {
            (ExamState::InProgress, Some(session)) => screen::render_question(session),
            (ExamState::Completed, Some(session)) => screen::render_completed(session),
            (state, _) => screen::render_form(
                self.runner.config(),
                self.runner.error(),
                state == ExamState::Generating,
            ),
        };
        self.print_line(&text)
    }

    fn print_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    fn shutdown(&mut self) {
        self.countdown.cancel();
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

/// 等待进行中的生成任务；没有任务时永远挂起
async fn wait_pending(
    pending: &mut Option<PendingGeneration>,
) -> Result<Vec<Question>, GenerationError> {
    match pending {
        Some(handle) => handle.await.unwrap_or_else(|e| Err(GenerationError::request_failed(e))),
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TextGenerator;
    use crate::models::exam_config::Difficulty;
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TWO_QUESTIONS: &str = "Q: First?\nA: yes\nB: no\nAnswer: A\n\nQ: Second?\nA: yes\nB: no\nAnswer: B\n";

    struct MockGenerator {
        text: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl TextGenerator for MockGenerator {
        fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = self.text.to_string();
            async move { Ok(text) }.boxed()
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn app(calls: &Arc<AtomicUsize>) -> App<Vec<u8>> {
        let generator = QuestionGenerator::new(Box::new(MockGenerator {
            text: TWO_QUESTIONS,
            calls: Arc::clone(calls),
        }));
        App::new(ExamConfig::default(), generator, Vec::new())
    }

    fn output(app: &App<Vec<u8>>) -> String {
        String::from_utf8_lossy(&app.out).to_string()
    }

    async fn finish_pending(app: &mut App<Vec<u8>>) {
        let result = wait_pending(&mut app.pending).await;
        app.pending = None;
        app.handle_generated(result).unwrap();
    }

    #[tokio::test]
    async fn test_empty_topic_sends_no_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(&calls);

        assert_eq!(app.handle_line("generate").unwrap(), Flow::Continue);
        assert!(app.pending.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(output(&app).contains("Please enter a topic."));
        assert_eq!(app.runner().state(), ExamState::Configuring);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_starts_countdown() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(&calls);

        app.handle_line("topic Geography").unwrap();
        app.handle_line("difficulty hard").unwrap();
        app.handle_line("g").unwrap();
        assert_eq!(app.runner().state(), ExamState::Generating);

        // 请求进行中不能重复提交
        app.handle_line("g").unwrap();
        assert!(output(&app).contains("Questions are already being generated."));

        finish_pending(&mut app).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.runner().state(), ExamState::InProgress);
        assert!(app.countdown.is_active());
        assert_eq!(app.runner().config().difficulty, Difficulty::Hard);
        assert!(output(&app).contains("Question 1 of 2"));
    }

    #[tokio::test]
    async fn test_late_generation_result_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(&calls);

        app.handle_generated(Ok(Vec::new())).unwrap();
        assert_eq!(app.runner().state(), ExamState::Configuring);
        assert!(app.runner().session().is_none());
        assert_eq!(app.runner().error(), None);
        assert!(!app.countdown.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_expiry_advances_question() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(&calls);
        app.handle_line("topic Geography").unwrap();
        app.handle_line("difficulty hard").unwrap();
        app.handle_line("g").unwrap();
        finish_pending(&mut app).await;

        let first_epoch = app.countdown.epoch();
        for _ in 0..30 {
            let tick = app.ticks.recv().await.unwrap();
            app.handle_tick(tick).unwrap();
        }

        let session = app.runner().session().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_left(), 30);
        assert!(app.countdown.epoch() > first_epoch);
        let out = output(&app);
        assert!(out.contains("Time's up!"));
        assert!(out.contains("Time: 0:29"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_requires_selection_and_finishing_cancels_timer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut app = app(&calls);
        app.handle_line("topic Geography").unwrap();
        app.handle_line("g").unwrap();
        finish_pending(&mut app).await;

        app.handle_line("next").unwrap();
        assert!(output(&app).contains("请先选择一个答案"));
        assert_eq!(app.runner().session().unwrap().current_index(), 0);

        app.handle_line("a").unwrap();
        app.handle_line("next").unwrap();
        app.handle_line("b").unwrap();
        app.handle_line("next").unwrap();

        assert_eq!(app.runner().state(), ExamState::Completed);
        assert!(!app.countdown.is_active());
        let out = output(&app);
        assert!(out.contains("Your score: 2 out of 2"));
        assert!(out.contains("Perfect Score"));

        app.handle_line("retry").unwrap();
        assert_eq!(app.runner().state(), ExamState::InProgress);
        assert!(app.countdown.is_active());

        assert_eq!(app.handle_line("quit").unwrap(), Flow::Quit);
    }
}
