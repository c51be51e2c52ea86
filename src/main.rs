use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use coco_labor::{
    config::{self, AppConfig},
    directory::{TaskFilter, WorkerFilter},
    errors::ServiceError,
    forms::{
        CocoProductForm, EntityForm, PurchasedItemForm, ReorderForm, StockForm, SupplierForm,
        TaskForm, WorkerForm,
    },
    models::{StockCategory, StockMovement, Task, TaskStatus, Worker},
    qr,
    reports::{DocumentRenderer, JsonRenderer, TextRenderer},
    services::{
        assignment, session, DirectoryService, FileSessionStore, LaborReport, Session,
    },
    theme::{self, Theme},
    validation::money,
    ApiClient, LaborApi,
};

#[derive(Parser)]
#[command(
    name = "coco-labor",
    about = "Coconut estate labor and inventory management",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Auth(AuthCommands),
    #[command(subcommand)]
    Workers(WorkersCommands),
    #[command(subcommand)]
    Tasks(TasksCommands),
    #[command(subcommand)]
    Products(InventoryCommands),
    #[command(subcommand)]
    Purchased(InventoryCommands),
    #[command(subcommand)]
    Suppliers(InventoryCommands),
    #[command(subcommand)]
    Stocks(StockCommands),
    #[command(subcommand)]
    Reorders(InventoryCommands),
    /// Generate the Labor Management Report
    Report(ReportArgs),
    /// Print the QR product URL for a coconut product
    Qr(QrArgs),
}

#[derive(Subcommand)]
enum AuthCommands {
    Login(LoginArgs),
    Logout,
    /// Show the restored session
    Whoami,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, help = "Email address for the account")]
    email: String,
    #[arg(long, help = "Password for the account")]
    password: String,
}

#[derive(Args)]
struct FieldArgs {
    #[arg(
        long = "set",
        value_name = "FIELD=VALUE",
        value_parser = parse_field,
        action = ArgAction::Append,
        help = "Form field to enter, e.g. --set qty=12 (repeatable)"
    )]
    fields: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum WorkersCommands {
    List(WorkerListArgs),
    Add(WorkerSaveArgs),
    Update(WorkerUpdateArgs),
    Delete(IdArgs),
    Details(IdArgs),
    Analytics,
    /// Worker-role accounts without a worker record
    Eligible,
}

#[derive(Args)]
struct WorkerListArgs {
    #[arg(long, default_value = "", help = "Prefix of id, name or job role")]
    query: String,
    #[arg(long, default_value = "", help = "Job role filter")]
    role: String,
    #[arg(long, default_value = "", help = "available | unavailable")]
    availability: String,
    #[arg(long, default_value = "recent", help = "recent | name | id")]
    sort: String,
}

#[derive(Args)]
struct WorkerSaveArgs {
    #[command(flatten)]
    form: FieldArgs,
    #[arg(long, action = ArgAction::SetTrue, help = "Register the worker as unavailable")]
    unavailable: bool,
}

#[derive(Args)]
struct WorkerUpdateArgs {
    #[arg(long)]
    id: String,
    #[command(flatten)]
    form: FieldArgs,
    #[arg(long, help = "Change availability")]
    available: Option<bool>,
}

#[derive(Args)]
struct IdArgs {
    #[arg(long)]
    id: String,
}

#[derive(Subcommand)]
enum TasksCommands {
    List(TaskListArgs),
    Add(TaskSaveArgs),
    Update(TaskUpdateArgs),
    /// Move a task to the trash
    Delete(IdArgs),
    Trash(TaskListArgs),
    Restore(IdArgs),
    /// Permanently delete a trashed task
    Purge(IdArgs),
    Status(TaskStatusArgs),
    /// Assign a worker to an existing task
    Assign(AssignArgs),
    /// Tasks assigned to the logged-in worker
    Mine(TaskListArgs),
    Analytics(TaskAnalyticsArgs),
}

#[derive(Args)]
struct TaskListArgs {
    #[arg(long, default_value = "", help = "Substring of id, title or description")]
    query: String,
    #[arg(long, default_value = "")]
    status: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    priority: String,
    #[arg(long, help = "Only tasks assigned to this worker")]
    worker: Option<String>,
    #[arg(long, default_value = "recent", help = "recent | title | id")]
    sort: String,
}

#[derive(Args)]
struct TaskSaveArgs {
    #[command(flatten)]
    form: FieldArgs,
    #[arg(
        long = "worker",
        action = ArgAction::Append,
        help = "Toggle a worker in the assignment (repeatable)"
    )]
    workers: Vec<String>,
}

#[derive(Args)]
struct TaskUpdateArgs {
    #[arg(long)]
    id: String,
    #[command(flatten)]
    save: TaskSaveArgs,
}

#[derive(Args)]
struct TaskStatusArgs {
    #[arg(long)]
    id: String,
    #[arg(long, help = "To Do | In Progress | Completed | On Hold")]
    status: String,
}

#[derive(Args)]
struct AssignArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    worker: String,
}

#[derive(Args)]
struct TaskAnalyticsArgs {
    #[arg(long, help = "Analytics for a single worker")]
    worker: Option<String>,
}

#[derive(Subcommand)]
enum InventoryCommands {
    List,
    Add(FieldArgs),
    Update(InventoryUpdateArgs),
}

#[derive(Args)]
struct InventoryUpdateArgs {
    #[arg(long)]
    id: String,
    #[command(flatten)]
    form: FieldArgs,
}

#[derive(Subcommand)]
enum StockCommands {
    List,
    Add(FieldArgs),
    Update(InventoryUpdateArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long, help = "First scheduled date included (YYYY-MM-DD)")]
    from: NaiveDate,
    #[arg(long, help = "Last scheduled date included (YYYY-MM-DD)")]
    to: NaiveDate,
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    #[arg(long, help = "Write the document here instead of stdout")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct QrArgs {
    #[arg(long)]
    id: String,
    #[arg(long, help = "Base URL; defaults to the configured qr_base_url")]
    base: Option<String>,
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))
}

struct CliContext {
    config: AppConfig,
    store: FileSessionStore,
    api: Arc<dyn LaborApi>,
    session: Session,
    today: NaiveDate,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);
        theme::install(Theme::from(&config.theme));

        let store = FileSessionStore::new(&config.session_path);
        let anonymous = ApiClient::new(&config.api_base_url).context("invalid API base URL")?;
        let session = session::initialize_session(&store, &anonymous)
            .await
            .context("failed to restore session")?;
        let client = match &session.token {
            Some(token) => anonymous.with_token(token.clone()),
            None => anonymous,
        };

        Ok(Self {
            config,
            store,
            api: Arc::new(client),
            session,
            today: Local::now().date_naive(),
        })
    }

    async fn directory(&self) -> DirectoryService {
        DirectoryService::load(self.api.clone()).await
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        report_failure(&err);
        std::process::exit(1);
    }
}

fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<ServiceError>() {
        Some(ServiceError::InvalidFields(fields)) => {
            eprintln!("{err}");
            for (field, message) in fields {
                eprintln!("  {field}: {message}");
            }
        }
        Some(service) => eprintln!("{err}: {}", service.operator_message()),
        None => eprintln!("error: {err:#}"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Qr(args) = &cli.command {
        let config = config::load_config().context("failed to load application config")?;
        let base = args.base.as_deref().unwrap_or(&config.qr_base_url);
        println!("{}", qr::product_url(base, &args.id).context("failed to build QR URL")?);
        return Ok(());
    }

    let context = CliContext::initialize().await?;
    match cli.command {
        Commands::Auth(command) => handle_auth(&context, command, cli.json).await,
        Commands::Workers(command) => handle_workers(&context, command, cli.json).await,
        Commands::Tasks(command) => handle_tasks(&context, command, cli.json).await,
        Commands::Products(command) => handle_products(&context, command, cli.json).await,
        Commands::Purchased(command) => handle_purchased(&context, command, cli.json).await,
        Commands::Suppliers(command) => handle_suppliers(&context, command, cli.json).await,
        Commands::Stocks(command) => handle_stocks(&context, command, cli.json).await,
        Commands::Reorders(command) => handle_reorders(&context, command, cli.json).await,
        Commands::Report(args) => handle_report(&context, args).await,
        Commands::Qr(_) => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fill<F: EntityForm>(form: &mut F, args: &FieldArgs, today: NaiveDate) -> Result<()> {
    for (field, value) in &args.fields {
        form.enter(field, value, today)
            .with_context(|| format!("cannot set field '{field}'"))?;
    }
    Ok(())
}

async fn handle_auth(context: &CliContext, command: AuthCommands, json: bool) -> Result<()> {
    match command {
        AuthCommands::Login(args) => {
            let response = session::login(&context.store, context.api.as_ref(), &args.email, &args.password)
                .await
                .context("login failed")?;
            if json {
                print_json(&response.user)?;
            } else {
                println!(
                    "Logged in as {} ({}); session saved to {}",
                    response.user.email,
                    response.user.role,
                    context.store.path().display()
                );
            }
        }
        AuthCommands::Logout => {
            session::logout(&context.store).context("failed to clear session")?;
            println!("Logged out");
        }
        AuthCommands::Whoami => {
            let s = &context.session;
            match (&s.user_email, s.worker()) {
                (None, _) => println!("Not logged in"),
                (Some(email), Some(worker)) => {
                    println!("{email} (worker {} • {})", worker.worker_id, worker.job_role)
                }
                (Some(email), None) => println!("{email}"),
            }
        }
    }
    Ok(())
}

fn render_worker(worker: &Worker) {
    println!(
        "- {} • {} • {} • {}",
        worker.worker_id,
        worker.name,
        worker.job_role,
        if worker.is_available { "available" } else { "unavailable" }
    );
}

fn render_task(task: &Task) {
    let date = task
        .scheduled_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unscheduled".into());
    let workers: Vec<&str> = task.assigned_workers.iter().map(String::as_str).collect();
    println!(
        "- {} • {} • {} • {} • {} • {}h • [{}]",
        task.task_id,
        task.title,
        task.status,
        task.priority,
        date,
        task.estimated_hours,
        workers.join(", ")
    );
}

fn print_list<T: Serialize>(items: &[T], json: bool, render: fn(&T)) -> Result<()> {
    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No records found.");
    }
    items.iter().for_each(render);
    Ok(())
}

async fn handle_workers(context: &CliContext, command: WorkersCommands, json: bool) -> Result<()> {
    let api = context.api.as_ref();
    match command {
        WorkersCommands::List(args) => {
            let filter = WorkerFilter::from_params(&args.query, &args.role, &args.availability, &args.sort)?;
            let directory = context.directory().await;
            print_list(&directory.visible_workers(&filter), json, render_worker)?;
        }
        WorkersCommands::Add(args) => {
            let mut directory = context.directory().await;
            let mut form = WorkerForm::new();
            form.set_available(!args.unavailable);
            fill(&mut form, &args.form, context.today)?;
            let worker = directory
                .save_worker(&mut form, context.today)
                .await
                .context("failed to register worker")?;
            println!("Worker {} registered", worker.worker_id);
        }
        WorkersCommands::Update(args) => {
            let mut directory = context.directory().await;
            let existing = directory
                .worker(&args.id)
                .ok_or_else(|| anyhow!("worker {} not found", args.id))?;
            let mut form = WorkerForm::edit(existing)?;
            if let Some(available) = args.available {
                form.set_available(available);
            }
            fill(&mut form, &args.form, context.today)?;
            let worker = directory
                .save_worker(&mut form, context.today)
                .await
                .context("failed to update worker")?;
            println!("Worker {} updated", worker.worker_id);
        }
        WorkersCommands::Delete(args) => {
            let mut directory = context.directory().await;
            directory
                .delete_worker(&args.id)
                .await
                .context("failed to delete worker")?;
            println!("Worker {} deleted", args.id);
        }
        WorkersCommands::Details(args) => {
            let details = api.worker_details(&args.id).await.context("failed to load worker")?;
            if json {
                print_json(&details)?;
            } else {
                render_worker(&details.worker);
                details.tasks.iter().for_each(render_task);
            }
        }
        WorkersCommands::Analytics => {
            let analytics = api.worker_analytics().await.context("failed to load analytics")?;
            if json {
                print_json(&analytics)?;
            } else {
                println!(
                    "Workers: {} ({} available)",
                    analytics.total_workers, analytics.available_workers
                );
                for (role, count) in &analytics.by_role {
                    println!("  {role}: {count}");
                }
            }
        }
        WorkersCommands::Eligible => {
            let users = api.eligible_users().await.context("failed to load users")?;
            if json {
                print_json(&users)?;
            } else {
                users.iter().for_each(|u| println!("- {} • {}", u.email, u.name));
            }
        }
    }
    Ok(())
}

fn task_filter(args: &TaskListArgs) -> Result<TaskFilter> {
    let mut filter = TaskFilter::from_params(
        &args.query,
        &args.status,
        &args.category,
        &args.priority,
        &args.sort,
    )?;
    filter.worker_id = args.worker.clone();
    Ok(filter)
}

fn toggle_workers(form: &mut TaskForm, workers: &[String]) {
    for worker in workers {
        form.toggle_worker(worker);
    }
}

async fn handle_tasks(context: &CliContext, command: TasksCommands, json: bool) -> Result<()> {
    let today = context.today;
    match command {
        TasksCommands::List(args) => {
            let filter = task_filter(&args)?;
            let directory = context.directory().await;
            print_list(&directory.visible_tasks(&filter), json, render_task)?;
        }
        TasksCommands::Trash(args) => {
            let filter = task_filter(&args)?;
            let directory = context.directory().await;
            print_list(&directory.visible_trash(&filter), json, render_task)?;
        }
        TasksCommands::Mine(args) => {
            let worker_id = context
                .session
                .context
                .worker_id()
                .ok_or_else(|| anyhow!("the logged-in account is not a worker"))?;
            let mut filter = task_filter(&args)?;
            filter.worker_id = None;
            let directory = context.directory().await;
            let tasks = directory.worker_tasks(worker_id).await;
            print_list(&filter.apply(&tasks), json, render_task)?;
        }
        TasksCommands::Add(args) => {
            let mut directory = context.directory().await;
            let mut form = TaskForm::new(today);
            toggle_workers(&mut form, &args.workers);
            fill(&mut form, &args.form, today)?;
            let task = directory
                .save_task(&mut form, today)
                .await
                .context("failed to create task")?;
            println!("Task {} created", task.task_id);
        }
        TasksCommands::Update(args) => {
            let mut directory = context.directory().await;
            let existing = directory
                .task(&args.id)
                .ok_or_else(|| anyhow!("task {} not found", args.id))?;
            let mut form = TaskForm::edit(existing)?;
            toggle_workers(&mut form, &args.save.workers);
            fill(&mut form, &args.save.form, today)?;
            let task = directory
                .save_task(&mut form, today)
                .await
                .context("failed to update task")?;
            println!("Task {} updated", task.task_id);
        }
        TasksCommands::Delete(args) => {
            let mut directory = context.directory().await;
            directory
                .trash_task(&args.id)
                .await
                .context("failed to move task to trash")?;
            println!("Task {} moved to trash", args.id);
        }
        TasksCommands::Restore(args) => {
            let mut directory = context.directory().await;
            directory
                .restore_task(&args.id)
                .await
                .context("failed to restore task")?;
            println!("Task {} restored", args.id);
        }
        TasksCommands::Purge(args) => {
            let mut directory = context.directory().await;
            directory
                .purge_task(&args.id)
                .await
                .context("failed to delete task")?;
            println!("Task {} permanently deleted", args.id);
        }
        TasksCommands::Status(args) => {
            let status = TaskStatus::parse_label(&args.status)
                .ok_or_else(|| anyhow!("unknown status '{}'", args.status))?;
            let mut directory = context.directory().await;
            let task = directory
                .set_status(&args.id, status)
                .await
                .context("failed to update status")?;
            println!("Task {} is now {}", task.task_id, task.status);
        }
        TasksCommands::Assign(args) => {
            let mut directory = context.directory().await;
            let task = assignment::assign_existing(&mut directory, &args.id, &args.worker)
                .await
                .context("failed to assign worker")?;
            println!(
                "Task {} now has {} worker(s)",
                task.task_id,
                task.assigned_workers.len()
            );
        }
        TasksCommands::Analytics(args) => {
            let analytics = match &args.worker {
                Some(worker) => context.api.worker_task_analytics(worker).await,
                None => context.api.task_analytics().await,
            }
            .context("failed to load task analytics")?;
            if json {
                print_json(&analytics)?;
            } else {
                println!(
                    "Tasks: {} • to do {} • in progress {} • completed {} • on hold {} • {}% complete",
                    analytics.total_tasks,
                    analytics.to_do,
                    analytics.in_progress,
                    analytics.completed,
                    analytics.on_hold,
                    analytics.completion_rate
                );
            }
        }
    }
    Ok(())
}

async fn handle_products(context: &CliContext, command: InventoryCommands, json: bool) -> Result<()> {
    let api = context.api.as_ref();
    let today = context.today;
    match command {
        InventoryCommands::List => {
            let products = api.list_products().await.context("failed to load products")?;
            print_list(&products, json, |p| {
                println!(
                    "- {} • {} • {} on hand ({} reserved) • sells at {}",
                    p.pro_id,
                    p.pro_name,
                    p.qty_on_hand,
                    p.qty_reserved,
                    money::format_money(p.sell_price)
                )
            })?;
        }
        InventoryCommands::Add(fields) => {
            let mut form = CocoProductForm::new();
            fill(&mut form, &fields, today)?;
            if !form.verify_unique(api).await? {
                bail!(ServiceError::Conflict(
                    form.error("pro_id").unwrap_or("Product ID is invalid").to_string()
                ));
            }
            let product = api
                .create_product(&form.submit(today)?)
                .await
                .context("failed to add product")?;
            println!("Product {} added", product.pro_id);
        }
        InventoryCommands::Update(args) => {
            let products = api.list_products().await.context("failed to load products")?;
            let existing = products
                .iter()
                .find(|p| p.pro_id == args.id)
                .ok_or_else(|| anyhow!("product {} not found", args.id))?;
            let mut form = CocoProductForm::edit(existing)?;
            fill(&mut form, &args.form, today)?;
            let product = api
                .update_product(&args.id, &form.submit(today)?)
                .await
                .context("failed to update product")?;
            println!("Product {} updated", product.pro_id);
        }
    }
    Ok(())
}

async fn handle_purchased(context: &CliContext, command: InventoryCommands, json: bool) -> Result<()> {
    let api = context.api.as_ref();
    let today = context.today;
    match command {
        InventoryCommands::List => {
            let items = api
                .list_purchased_items()
                .await
                .context("failed to load purchased items")?;
            print_list(&items, json, |i| {
                println!(
                    "- {} • {} • {} on hand ({} reserved) • unit cost {}",
                    i.item_id,
                    i.item_name,
                    i.qty_on_hand,
                    i.qty_reserved,
                    money::format_money(i.unit_cost)
                )
            })?;
        }
        InventoryCommands::Add(fields) => {
            let mut form = PurchasedItemForm::new();
            fill(&mut form, &fields, today)?;
            let item = api
                .create_purchased_item(&form.submit(today)?)
                .await
                .context("failed to add purchased item")?;
            println!("Purchased item {} added", item.item_id);
        }
        InventoryCommands::Update(args) => {
            let items = api
                .list_purchased_items()
                .await
                .context("failed to load purchased items")?;
            let existing = items
                .iter()
                .find(|i| i.item_id == args.id)
                .ok_or_else(|| anyhow!("purchased item {} not found", args.id))?;
            let mut form = PurchasedItemForm::edit(existing)?;
            fill(&mut form, &args.form, today)?;
            let item = api
                .update_purchased_item(&args.id, &form.submit(today)?)
                .await
                .context("failed to update purchased item")?;
            println!("Purchased item {} updated", item.item_id);
        }
    }
    Ok(())
}

async fn handle_suppliers(context: &CliContext, command: InventoryCommands, json: bool) -> Result<()> {
    let api = context.api.as_ref();
    let today = context.today;
    match command {
        InventoryCommands::List => {
            let suppliers = api.list_suppliers().await.context("failed to load suppliers")?;
            print_list(&suppliers, json, |s| {
                println!("- {} • {} • {} • {}", s.sup_id, s.sup_name, s.email, s.phone)
            })?;
        }
        InventoryCommands::Add(fields) => {
            let mut form = SupplierForm::new();
            fill(&mut form, &fields, today)?;
            let supplier = api
                .create_supplier(&form.submit(today)?)
                .await
                .context("failed to add supplier")?;
            println!("Supplier {} added", supplier.sup_id);
        }
        InventoryCommands::Update(args) => {
            let suppliers = api.list_suppliers().await.context("failed to load suppliers")?;
            let existing = suppliers
                .iter()
                .find(|s| s.sup_id == args.id)
                .ok_or_else(|| anyhow!("supplier {} not found", args.id))?;
            let mut form = SupplierForm::edit(existing)?;
            fill(&mut form, &args.form, today)?;
            let supplier = api
                .update_supplier(&args.id, &form.submit(today)?)
                .await
                .context("failed to update supplier")?;
            println!("Supplier {} updated", supplier.sup_id);
        }
    }
    Ok(())
}

/// On-hand quantity of the item a stock movement refers to.
async fn on_hand(api: &dyn LaborApi, form: &StockForm) -> Result<Option<u32>> {
    let item_id = form.value("item_id").trim();
    let category = form.value("category").trim().parse::<StockCategory>().ok();
    Ok(match category {
        Some(StockCategory::Product) => api
            .list_products()
            .await?
            .into_iter()
            .find(|p| p.pro_id == item_id)
            .map(|p| p.qty_on_hand),
        Some(StockCategory::Purchased) => api
            .list_purchased_items()
            .await?
            .into_iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.qty_on_hand),
        None => None,
    })
}

fn render_stock(stock: &StockMovement) {
    println!(
        "- {} • {} {} • {} × {} • {} • {}",
        stock.stock_id,
        stock.category,
        stock.item_id,
        stock.movement_type,
        stock.qty,
        money::format_money(stock.tot_value),
        stock.date
    );
}

async fn handle_stocks(context: &CliContext, command: StockCommands, json: bool) -> Result<()> {
    let api = context.api.as_ref();
    let today = context.today;
    let (mut form, target) = match command {
        StockCommands::List => {
            let stocks = api.list_stocks().await.context("failed to load stock movements")?;
            return print_list(&stocks, json, render_stock);
        }
        StockCommands::Add(fields) => {
            let mut form = StockForm::new(today);
            fill(&mut form, &fields, today)?;
            if !form.verify_unique(api).await? {
                bail!(ServiceError::Conflict(
                    form.error("stock_id").unwrap_or("Stock ID is invalid").to_string()
                ));
            }
            (form, None)
        }
        StockCommands::Update(args) => {
            let stocks = api.list_stocks().await.context("failed to load stock movements")?;
            let existing = stocks
                .iter()
                .find(|s| s.stock_id == args.id)
                .ok_or_else(|| anyhow!("stock movement {} not found", args.id))?;
            let mut form = StockForm::edit(existing)?;
            fill(&mut form, &args.form, today)?;
            (form, Some(args.id))
        }
    };

    let available = on_hand(api, &form).await.context("failed to load item quantities")?;
    form.set_available(available, today);
    println!("Total value: {}", form.total_display());
    let payload = form.submit(today)?;
    let saved = match target {
        None => api.create_stock(&payload).await,
        Some(id) => api.update_stock(&id, &payload).await,
    }
    .context("failed to save stock movement")?;
    println!("Stock movement {} saved", saved.stock_id);
    Ok(())
}

async fn handle_reorders(context: &CliContext, command: InventoryCommands, json: bool) -> Result<()> {
    let api = context.api.as_ref();
    let today = context.today;
    match command {
        InventoryCommands::List => {
            let reorders = api.list_reorders().await.context("failed to load reorders")?;
            print_list(&reorders, json, |r| {
                println!(
                    "- {} • {} • {} × {} = {} • {}",
                    r.order_id,
                    r.item_id,
                    r.qty,
                    money::format_money(r.unit_cost),
                    money::format_money(r.tot_value),
                    r.requested_by
                )
            })?;
        }
        InventoryCommands::Add(fields) => {
            let mut form = ReorderForm::new();
            fill(&mut form, &fields, today)?;
            if !form.verify_unique(api).await? {
                bail!(ServiceError::Conflict(
                    form.error("order_id").unwrap_or("Order ID is invalid").to_string()
                ));
            }
            println!("Total value: {}", form.total_display());
            let reorder = api
                .create_reorder(&form.submit(today)?)
                .await
                .context("failed to add reorder")?;
            println!("Reorder {} added", reorder.order_id);
        }
        InventoryCommands::Update(args) => {
            let reorders = api.list_reorders().await.context("failed to load reorders")?;
            let existing = reorders
                .iter()
                .find(|r| r.order_id == args.id)
                .ok_or_else(|| anyhow!("reorder {} not found", args.id))?;
            let mut form = ReorderForm::edit(existing)?;
            fill(&mut form, &args.form, today)?;
            println!("Total value: {}", form.total_display());
            let reorder = api
                .update_reorder(&args.id, &form.submit(today)?)
                .await
                .context("failed to update reorder")?;
            println!("Reorder {} updated", reorder.order_id);
        }
    }
    Ok(())
}

async fn handle_report(context: &CliContext, args: ReportArgs) -> Result<()> {
    let directory = context.directory().await;
    let report = LaborReport::build(directory.workers(), directory.tasks(), args.from, args.to, Utc::now())?;
    let renderer: Box<dyn DocumentRenderer> = match args.format {
        ReportFormat::Text => Box::new(TextRenderer),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    let document = renderer.render(&report, theme::current())?;

    match args.output {
        Some(path) => {
            fs::write(&path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report {} written to {}", report.report_id, path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&document)),
    }
    tracing::debug!(environment = %context.config.environment, "report generated");
    Ok(())
}
