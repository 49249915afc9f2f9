use leptos::prelude::*;

use crate::components::neural_graph::{GraphConfig, NeuralGraphCanvas};
use crate::components::particle_field::ParticleBackground;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let concept = RwSignal::new(None::<&'static str>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<ParticleBackground />
			<section class="brain-section">
				<div class="brain-stage">
					<NeuralGraphCanvas concept=concept config=GraphConfig::default() />
					<div class="graph-overlay">
						<h1>"Neural Network"</h1>
						<p class="subtitle">"Hover a node to see its concept. Drag to orbit, scroll to zoom, click the background to pulse."</p>
					</div>
					<p class="concept-label" class:visible=move || concept.get().is_some()>
						{move || concept.get().unwrap_or_default()}
					</p>
				</div>
			</section>
		</ErrorBoundary>
	}
}
