//! Dioxus desktop view of the dashboard document
//!
//! Components render a [`Document`] snapshot with the fixed element ids and
//! report user actions as [`Command`]s. They hold no dashboard state.

pub mod charts;

use dioxus::prelude::*;

use crate::document::{
    AlertView, Banner, CardView, Chart, CheckView, Document, ElementId, Node, RowView,
    SelectOption, LOADING_CLASS,
};
use crate::filters::FilterControl;
use crate::refresh::RefreshTrigger;
use crate::session::Command;

pub use charts::{ResolutionBars, StatusDonut};

/// Whole dashboard page
#[component]
pub fn Dashboard(document: Document, on_command: EventHandler<Command>) -> Element {
    let loading = document.is_loading();
    let refreshing = document
        .get(ElementId::RefreshBtn)
        .map(|e| e.has_class(LOADING_CLASS))
        .unwrap_or(false);
    let last_update = document.text(ElementId::LastUpdate).unwrap_or("").to_string();

    rsx! {
        div {
            id: ElementId::DashboardContainer.as_str(),
            class: if loading { "dashboard loading" } else { "dashboard" },

            header { class: "dashboard-header",
                h1 { "Contratos em tempo real" }
                div { class: "header-meta",
                    span { class: "last-update-label", "Última atualização: " }
                    span { id: ElementId::LastUpdate.as_str(), "{last_update}" }
                }
                if document.contains(ElementId::RefreshBtn) {
                    button {
                        id: ElementId::RefreshBtn.as_str(),
                        class: if refreshing { "btn btn-primary loading" } else { "btn btn-primary" },
                        disabled: refreshing,
                        onclick: move |_| on_command.call(Command::Refresh(RefreshTrigger::Manual)),
                        "Atualizar"
                    }
                }
            }

            FilterBar { document: document.clone(), on_command }

            section { class: "counters",
                CounterCard { document: document.clone(), id: ElementId::TotalContracts, label: "Total de Contratos" }
                CounterCard { document: document.clone(), id: ElementId::TotalVerified, label: "Verificados" }
                CounterCard { document: document.clone(), id: ElementId::TotalAnalysis, label: "Em Análise" }
                CounterCard { document: document.clone(), id: ElementId::TotalApproved, label: "Aprovados" }
            }

            section { class: "charts",
                ChartPanel { document: document.clone(), id: ElementId::StatusChart, title: "Distribuição por Status" }
                ChartPanel { document: document.clone(), id: ElementId::ResolutionChart, title: "Tempo Médio de Resolução" }
            }

            section { class: "main-grid",
                div { class: "panel collaborators-panel",
                    h2 { "Colaboradores" }
                    ContainerView { document: document.clone(), id: ElementId::CollaboratorMetrics }
                }
                div { class: "panel alerts-panel",
                    h2 { "Alertas" }
                    ContainerView { document: document.clone(), id: ElementId::AlertsContainer }
                }
            }

            CollaboratorTable { document: document.clone() }

            HealthPanel { document: document.clone(), on_command }

            if loading {
                div { class: "loading-overlay",
                    div { class: "spinner" }
                    span { "Carregando..." }
                }
            }
        }
    }
}

/// Group, collaborator, status and date filters
#[component]
fn FilterBar(document: Document, on_command: EventHandler<Command>) -> Element {
    rsx! {
        section { class: "filter-bar",
            FilterSelect { document: document.clone(), control: FilterControl::Group, label: "Grupo", on_command }
            FilterSelect { document: document.clone(), control: FilterControl::Collaborator, label: "Colaborador", on_command }
            FilterSelect { document: document.clone(), control: FilterControl::Status, label: "Status", on_command }
            if document.contains(ElementId::DataFilter) {
                label { class: "filter",
                    span { "Data" }
                    input {
                        id: ElementId::DataFilter.as_str(),
                        r#type: "date",
                        value: document.value(ElementId::DataFilter),
                        onchange: move |e: FormEvent| on_command.call(Command::FilterChanged {
                            control: FilterControl::Date,
                            value: e.value(),
                        }),
                    }
                }
            }
        }
    }
}

#[component]
fn FilterSelect(
    document: Document,
    control: FilterControl,
    label: &'static str,
    on_command: EventHandler<Command>,
) -> Element {
    let id = control.element();
    let Some(element) = document.get(id) else {
        return rsx! {};
    };
    let selected = element.value.clone();
    let options: Vec<SelectOption> = element.options.clone();

    rsx! {
        label { class: "filter",
            span { "{label}" }
            select {
                id: id.as_str(),
                value: "{selected}",
                onchange: move |e: FormEvent| on_command.call(Command::FilterChanged {
                    control,
                    value: e.value(),
                }),
                for choice in options.iter() {
                    option {
                        value: "{choice.value}",
                        selected: choice.value == selected,
                        "{choice.label}"
                    }
                }
            }
        }
    }
}

#[component]
fn CounterCard(document: Document, id: ElementId, label: &'static str) -> Element {
    let Some(text) = document.text(id) else {
        return rsx! {};
    };
    let text = text.to_string();

    rsx! {
        div { class: "counter-card",
            span { class: "counter-label", "{label}" }
            span { id: id.as_str(), class: "counter-value", "{text}" }
        }
    }
}

#[component]
fn ChartPanel(document: Document, id: ElementId, title: &'static str) -> Element {
    let Some(element) = document.get(id) else {
        return rsx! {};
    };
    let chart = element.chart.clone();

    rsx! {
        div { class: "panel chart-panel",
            h2 { "{title}" }
            div { id: id.as_str(),
                match chart {
                    Some(Chart::Donut(chart)) => rsx! { StatusDonut { chart } },
                    Some(Chart::Bar(chart)) => rsx! { ResolutionBars { chart } },
                    None => rsx! { div { class: "chart-empty", "Aguardando dados" } },
                }
            }
        }
    }
}

/// A container element: banners first, then its child nodes
#[component]
fn ContainerView(document: Document, id: ElementId) -> Element {
    let Some(element) = document.get(id) else {
        return rsx! {};
    };
    let banners = element.banners.clone();
    let children = element.children.clone();

    rsx! {
        div { id: id.as_str(), class: "container-body",
            for banner in banners {
                BannerView { key: "{banner.id}", banner: banner.clone() }
            }
            for node in children {
                NodeView { node }
            }
        }
    }
}

#[component]
fn BannerView(banner: Banner) -> Element {
    rsx! {
        div { class: "alert alert-danger",
            i { class: "bi bi-exclamation-circle" }
            span { "{banner.message}" }
        }
    }
}

#[component]
pub fn NodeView(node: Node) -> Element {
    match node {
        Node::GroupHeader { group } => rsx! {
            h3 { class: "group-header", "Grupo {group}" }
        },
        Node::CollaboratorCard(card) => rsx! { CollaboratorCard { card } },
        Node::TableRow(row) => rsx! { TableRowView { row } },
        Node::Alert(alert) => rsx! { AlertItem { alert } },
        Node::Notice { text } => rsx! {
            div { class: "alert alert-info",
                i { class: "bi bi-info-circle" }
                span { "{text}" }
            }
        },
        Node::HealthChecklist(checks) => rsx! { HealthChecklist { checks } },
    }
}

#[component]
fn CollaboratorCard(card: CardView) -> Element {
    rsx! {
        div { class: "collaborator-card",
            div { class: "card-title",
                span { class: "card-name", "{card.name}" }
                span { class: "badge", "{card.group}" }
            }
            dl { class: "card-stats",
                dt { "Verificados" }
                dd { "{card.verified}" }
                dt { "Em Análise" }
                dd { "{card.analysis}" }
                dt { "Aprovados" }
                dd { "{card.approved}" }
                dt { "Tempo Médio" }
                dd { "{card.resolution}h" }
            }
        }
    }
}

#[component]
fn AlertItem(alert: AlertView) -> Element {
    rsx! {
        div { class: "alert alert-{alert.style_class}",
            i { class: "bi {alert.icon}" }
            div { class: "alert-body",
                span { class: "alert-message", "{alert.message}" }
                small { class: "alert-time", "{alert.created_at}" }
            }
        }
    }
}

#[component]
fn CollaboratorTable(document: Document) -> Element {
    let Some(element) = document.get(ElementId::ColaboradoresTable) else {
        return rsx! {};
    };
    let rows = element.children.clone();

    rsx! {
        div { class: "panel table-panel",
            h2 { "Detalhamento" }
            table { id: ElementId::ColaboradoresTable.as_str(), class: "table",
                thead {
                    tr {
                        th { "Colaborador" }
                        th { "Grupo" }
                        th { "Total" }
                        th { "Verificados" }
                        th { "Em Análise" }
                        th { "Aprovados" }
                        th { "Tempo Médio" }
                    }
                }
                tbody {
                    for node in rows {
                        NodeView { node }
                    }
                }
            }
        }
    }
}

#[component]
fn TableRowView(row: RowView) -> Element {
    rsx! {
        tr {
            td { "{row.name}" }
            td { "{row.group}" }
            td { "{row.total}" }
            td { "{row.verified}" }
            td { "{row.analysis}" }
            td { "{row.approved}" }
            td { "{row.resolution}" }
        }
    }
}

#[component]
fn HealthPanel(document: Document, on_command: EventHandler<Command>) -> Element {
    if !document.contains(ElementId::HealthStatus) {
        return rsx! {};
    }

    rsx! {
        div { class: "panel health-panel",
            div { class: "panel-header",
                h2 { "Saúde do painel" }
                button {
                    class: "btn btn-outline",
                    onclick: move |_| on_command.call(Command::CheckHealth),
                    "Verificar"
                }
            }
            ContainerView { document: document.clone(), id: ElementId::HealthStatus }
        }
    }
}

#[component]
fn HealthChecklist(checks: Vec<CheckView>) -> Element {
    rsx! {
        ul { class: "health-checklist",
            for check in checks {
                li {
                    class: if check.passed { "text-success" } else { "text-danger" },
                    if check.passed { "✅ " } else { "❌ " }
                    "{check.label}"
                }
            }
        }
    }
}
