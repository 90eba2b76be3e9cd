//! Card linking to one unit's detail page.

use leptos::prelude::*;

use crate::net::types::Unit;

#[component]
pub fn UnitCard(unit: Unit) -> impl IntoView {
    let href = format!("/units/{}", unit.id);
    let teacher_line = unit.teacher_name.clone();

    view! {
        <a class="unit-card" href=href>
            <span class="unit-card__code">{unit.code}</span>
            <h3 class="unit-card__title">{unit.title}</h3>
            {teacher_line.map(|teacher| view! { <p class="unit-card__teacher">{teacher}</p> })}
        </a>
    }
}
