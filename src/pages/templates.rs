use minijinja::{context, Environment};
use once_cell::sync::OnceCell;
use serde::Serialize;

pub const INDEX_TITLE: &str = "WhatsApp Pairing Bot";
pub const WAITING_TITLE: &str = "Waiting for Pairing Code";

static TEMPLATE_STATE: OnceCell<TemplateState> = OnceCell::new();

struct TemplateState {
    env: Environment<'static>,
}

impl TemplateState {
    fn load() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("index.html", include_str!("../../templates/index.html"))?;
        env.add_template("waiting.html", include_str!("../../templates/waiting.html"))?;
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: impl Serialize) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

fn template_state() -> Result<&'static TemplateState, minijinja::Error> {
    TEMPLATE_STATE.get_or_try_init(TemplateState::load)
}

pub fn render_index(
    error: Option<&str>,
    phone_number: Option<&str>,
) -> Result<String, minijinja::Error> {
    template_state()?.render(
        "index.html",
        context! {
            title => INDEX_TITLE,
            error => error,
            phone_number => phone_number,
        },
    )
}

pub fn render_waiting(request_id: &str, phone_number: &str) -> Result<String, minijinja::Error> {
    template_state()?.render(
        "waiting.html",
        context! {
            title => WAITING_TITLE,
            request_id => request_id,
            phone_number => phone_number,
        },
    )
}
